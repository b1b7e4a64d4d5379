use cucumber::given;

use crate::cucumber::{TopupSystem, TopupWorld};

#[given("a fresh install")]
async fn fresh_install(world: &mut TopupWorld) {
    let system = TopupSystem::new().await;
    world.system = Some(system);
}
