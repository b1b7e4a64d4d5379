use thiserror::Error;
use topup_engine::db_types::OrderId;

pub const HELP_TEXT: &str = "/approve <user_id> <hour|month|year> — grant access\n/revoke <user_id> — remove \
                             access\n/genlink <diamonds> [target_user_id] [hour|month|year] — generate unique redeem \
                             link\n/confirm <order_id> [fail] — confirm order success or fail\n/orders — list recent \
                             orders (admin)\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Start,
    Help,
    Approve,
    Revoke,
    GenLink,
    Confirm,
    Orders,
}

impl CommandKind {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "start" => Some(Self::Start),
            "help" => Some(Self::Help),
            "approve" => Some(Self::Approve),
            "revoke" => Some(Self::Revoke),
            "genlink" => Some(Self::GenLink),
            "confirm" => Some(Self::Confirm),
            "orders" => Some(Self::Orders),
            _ => None,
        }
    }

    pub fn admin_only(&self) -> bool {
        matches!(self, Self::Approve | Self::Revoke | Self::Confirm | Self::Orders)
    }
}

/// A recognised command and its whitespace-separated arguments, before the arguments are validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub kind: CommandKind,
    pub args: Vec<String>,
}

impl CommandLine {
    /// Returns `None` for anything that is not one of the bot's commands. `/cmd@SomeBot` is treated as `/cmd`.
    pub fn parse(text: &str) -> Option<Self> {
        let mut parts = text.split_whitespace();
        let first = parts.next()?.strip_prefix('/')?;
        let name = first.split_once('@').map(|(name, _bot)| name).unwrap_or(first);
        let kind = CommandKind::from_name(&name.to_ascii_lowercase())?;
        let args = parts.map(String::from).collect();
        Some(Self { kind, args })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotCommand {
    Start,
    Help,
    Approve { user_id: i64, period: String },
    Revoke { user_id: i64 },
    GenLink { diamonds: u32, target: Option<i64>, period: Option<String> },
    Confirm { order_id: OrderId, fail: bool },
    Orders,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Usage: {0}")]
    Usage(&'static str),
    #[error("Invalid user id")]
    InvalidUserId,
    #[error("Invalid diamonds number")]
    InvalidDiamonds,
}

impl TryFrom<CommandLine> for BotCommand {
    type Error = CommandError;

    fn try_from(line: CommandLine) -> Result<Self, Self::Error> {
        let args = line.args;
        match line.kind {
            CommandKind::Start => Ok(Self::Start),
            CommandKind::Help => Ok(Self::Help),
            CommandKind::Orders => Ok(Self::Orders),
            CommandKind::Approve => match args.as_slice() {
                [user_id, period, ..] => Ok(Self::Approve { user_id: parse_user_id(user_id)?, period: period.clone() }),
                _ => Err(CommandError::Usage("/approve <user_id> <hour|month|year>")),
            },
            CommandKind::Revoke => match args.as_slice() {
                [user_id, ..] => Ok(Self::Revoke { user_id: parse_user_id(user_id)? }),
                _ => Err(CommandError::Usage("/revoke <user_id>")),
            },
            CommandKind::GenLink => {
                let Some(diamonds) = args.first() else {
                    return Err(CommandError::Usage("/genlink <diamonds> [target_user_id] [hour|month|year]"));
                };
                let diamonds = diamonds.parse::<u32>().map_err(|_| CommandError::InvalidDiamonds)?;
                // A numeric second argument is the target user; anything else is the period
                let (target, period) = match args.get(1) {
                    Some(arg) => match arg.parse::<i64>() {
                        Ok(target) => (Some(target), args.get(2).cloned()),
                        Err(_) => (None, Some(arg.clone())),
                    },
                    None => (None, None),
                };
                Ok(Self::GenLink { diamonds, target, period })
            },
            CommandKind::Confirm => match args.as_slice() {
                [order_id, rest @ ..] => {
                    let fail = rest.first().map(|s| s.eq_ignore_ascii_case("fail")).unwrap_or(false);
                    Ok(Self::Confirm { order_id: OrderId::from(order_id.as_str()), fail })
                },
                _ => Err(CommandError::Usage("/confirm <order_id> [fail]")),
            },
        }
    }
}

fn parse_user_id(s: &str) -> Result<i64, CommandError> {
    s.parse::<i64>().map_err(|_| CommandError::InvalidUserId)
}
