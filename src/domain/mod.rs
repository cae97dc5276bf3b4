pub mod park;

pub use park::{NpsImage, NpsInfo, Park, ParkDetail, best_time_to_go};
