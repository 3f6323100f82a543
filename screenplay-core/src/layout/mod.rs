// Layout: style resolution, height measurement, pagination.
// The three phases run in that order; the paginator only ever sees heights.

pub mod measure;
pub mod paginator;
pub mod style;

pub use measure::{HeightMeasurer, MonospaceMeasurer};
pub use paginator::{Pagination, Paginator};
pub use style::{ElementStyle, StyleResolver, StyleSheet, TextAlignment};
