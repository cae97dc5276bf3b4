pub mod parks;

pub use parks::{fetch_park_detail, fetch_parks, load_parks_file};
