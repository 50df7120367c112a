//! Measurement queries
//!
//! Narrows a latest-first measurement collection before it is analyzed or
//! printed:
//!
//! - **Parser**: Parse date and time-of-day bounds from user input
//! - **Filter**: Date range, time-of-day window and limit
//!
//! # Examples
//!
//! ```rust
//! use bm65::query::{parse_date, parse_time, Filter};
//!
//! # fn main() -> Result<(), bm65::query::QueryError> {
//! // Evening and night readings since June, at most 10
//! let filter = Filter::new()
//!     .from_date(parse_date("2016-06-01")?)
//!     .from_time(parse_time("21:00")?)
//!     .to_time(parse_time("09:00")?)
//!     .limit(10);
//! # let _ = filter;
//! # Ok(())
//! # }
//! ```

mod error;
mod filter;
mod parser;

pub use error::{QueryError, QueryResult};
pub use filter::{filter_date_range, filter_time_of_day, limit, Filter};
pub use parser::{parse_date, parse_date_at, parse_time};
