pub mod json_map_store;
