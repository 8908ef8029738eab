//! # Lux Search
//!
//! Search and detail views over a read-only museum object catalog stored
//! in SQLite.
//!
//! Four optional free-text filters (label, classifier, agent, date) become a
//! single composite query that aggregates each object's agents and
//! classifiers; rows are decoded back into [`models::CatalogObject`]s. A
//! separate aggregator assembles the full [`models::ObjectDetail`] for one
//! object, including a thumbnail check against the external media service.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌──────────┐   ┌──────────┐
//! │  filter  │──▶│  query   │──▶│  search  │──┐
//! └──────────┘   └──────────┘   └──────────┘  │   ┌─────────┐
//!                                             ├──▶│ catalog │
//!                ┌──────────┐   ┌──────────┐  │   └────┬────┘
//!                │  media   │──▶│ details  │──┘        │
//!                └──────────┘   └──────────┘     ┌─────┴─────┐
//!                                                ▼           ▼
//!                                           ┌────────┐  ┌────────┐
//!                                           │  CLI   │  │  HTTP  │
//!                                           │ (lux)  │  │ server │
//!                                           └────────┘  └────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! lux check                       # verify the database opens
//! lux search -a smith -d 1850     # search from the command line
//! lux show 1234                   # print one object's detail
//! lux serve --port 55555          # start the web server
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`error`] | Catalog error type |
//! | [`db`] | Read-only database connection |
//! | [`models`] | Core data types |
//! | [`filter`] | Search predicate construction |
//! | [`query`] | Composite search query |
//! | [`search`] | Search execution and result decoding |
//! | [`details`] | Object detail aggregation |
//! | [`media`] | Thumbnail existence checks |
//! | [`catalog`] | Facade over pool and probe |
//! | [`render`] | HTML pages |
//! | [`server`] | HTTP server |

pub mod catalog;
pub mod config;
pub mod db;
pub mod details;
pub mod error;
pub mod filter;
pub mod media;
pub mod models;
pub mod query;
pub mod render;
pub mod search;
pub mod server;
