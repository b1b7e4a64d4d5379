mod helpers;
mod mocks;
mod purchase;
mod redeem;
