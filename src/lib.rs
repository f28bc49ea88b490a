pub mod api;
pub mod broker;
pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod queries;
pub mod service;

pub use config::Config;
pub use db::{GraphClient, GraphQuery, Neo4jHttpClient, Record};
pub use error::{BrokerGraphError, Result};
pub use service::{Page, PageRequest, Services};
