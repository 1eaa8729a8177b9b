//! Feed Reader - a minimal feed-reader widget
//!
//! A fixed list of feeds, a collapsible navigation menu, and a loader that
//! fetches a feed and swaps its entries into the page's display container.

pub mod config;
pub mod container;
pub mod loader;
pub mod menu;
pub mod registry;
pub mod routes;
