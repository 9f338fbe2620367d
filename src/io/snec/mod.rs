//! SNEC inputs and outputs: `.xg` profile series, two-column `.dat` time
//! series, composition profiles and grid patterns.

pub mod dat;
pub mod grid;
pub mod iso;
pub mod xg;

pub use dat::TimeSeries;
pub use iso::IsoProfile;
pub use xg::Snapshot;
