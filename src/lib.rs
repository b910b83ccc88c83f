//! Compensation Engine for Israeli employment packages
//!
//! This crate values a full compensation package (salary, employer benefits,
//! equity grants and perks) under Israeli tax rules, converting USD figures
//! to ILS through a cached exchange-rate service.
//!
//! Results are estimates for comparison purposes only and are not tax or
//! legal advice.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use compensation_engine::calculation::CompensationCalculator;
//! use compensation_engine::config::ConfigLoader;
//!
//! # async fn run(package: compensation_engine::models::CompensationPackage) {
//! let config = ConfigLoader::load("./config/israel").unwrap().into_config();
//! let calculator = CompensationCalculator::from_config(Arc::new(config)).unwrap();
//!
//! let report = calculator.validate_inputs(&package);
//! if report.is_valid {
//!     let result = calculator.calculate(&package).await.unwrap();
//!     println!("Total gross: {} ILS", result.total_gross);
//! }
//! # }
//! ```

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod clock;
pub mod config;
pub mod currency;
pub mod error;
pub mod models;
