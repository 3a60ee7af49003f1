mod server;
pub use server::{Server, map_internal_error, new_server, router};

mod tiles;
pub use tiles::{TileRequest, parse_tile_row};
