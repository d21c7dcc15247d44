// Library root
// ------------
// The binary (`main.rs`) only parses the configuration, sets up logging and
// hands a console and an API client to `ui::run`. Everything else lives here
// so it can be tested without a terminal or a server.
//
// Module responsibilities:
// - `values`: validated values; every raw input goes through one of them.
// - `console`: line-oriented terminal I/O behind a trait.
// - `interact`: prompt, validate, ask again.
// - `menu`: keyed menus built once and run in a loop.
// - `api`: HTTP client for the catalog service and the `Catalog` trait.
// - `session`, `token_store`, `table`, `ui`: the Fiordispino application.
// - `config`: command-line and environment configuration.
pub mod api;
pub mod config;
pub mod console;
pub mod interact;
pub mod menu;
pub mod session;
pub mod table;
pub mod token_store;
pub mod ui;
pub mod values;
