use std::path::PathBuf;

use cucumber::World;
use log::*;
use tempfile::TempDir;
use topup_engine::{
    db_types::{Link, Order},
    events::EventProducers,
    CorruptionPolicy,
    JsonFileDatabase,
    LinkApi,
    OrderFlowApi,
};

#[derive(Default, Debug, World)]
pub struct TopupWorld {
    pub system: Option<TopupSystem>,
    pub last_link: Option<Link>,
    pub last_order: Option<Order>,
    pub last_error: Option<String>,
}

#[derive(Debug)]
pub struct TopupSystem {
    dir: Option<TempDir>,
    pub links: LinkApi<JsonFileDatabase>,
    pub orders: OrderFlowApi<JsonFileDatabase>,
}

impl TopupWorld {
    pub fn system(&self) -> &TopupSystem {
        self.system.as_ref().expect("Topup system not initialised")
    }

    pub fn last_link(&self) -> &Link {
        self.last_link.as_ref().expect("No link has been issued")
    }

    pub fn last_order(&self) -> &Order {
        self.last_order.as_ref().expect("No order has been created")
    }
}

impl TopupSystem {
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().expect("Error creating temporary directory");
        let db = JsonFileDatabase::open(dir.path(), CorruptionPolicy::ResetToDefault)
            .await
            .expect("Error creating test store");
        debug!("Created store in {}", dir.path().display());
        let links = LinkApi::new(db.clone());
        let orders = OrderFlowApi::new(db, EventProducers::default());
        Self { dir: Some(dir), links, orders }
    }

    /// Stops the data directory from being deleted when the world is dropped, and returns its path.
    pub fn retain_data_dir(&mut self) -> PathBuf {
        match self.dir.take() {
            Some(dir) => dir.into_path(),
            None => self.links.db().data_dir().to_path_buf(),
        }
    }
}
