//! Results analytics for snow coverage records.
//!
//! Records fetched into a [`repository::ResultsRepository`] are filtered and
//! sorted through [`view::ResultsView`], summarized with a least-squares
//! [`trend`] line, and exported with [`export::to_csv`].

pub mod export;
pub mod repository;
pub mod trend;
pub mod view;
