//! Numeric kernels for the tabstat analysis engine.
//!
//! This crate provides the building blocks the engine composes:
//!
//! - **Descriptive statistics**: mean, median, mode, population variance, quartiles
//! - **Percentiles**: linear-interpolation quantiles and Tukey fences
//! - **Distributions**: Student t, F, chi-squared and normal probabilities
//! - **Correlation**: Pearson coefficient, its p-value, and autocorrelation
//! - **Regression**: closed-form simple linear regression
//! - **Normality**: Shapiro-Wilk and Jarque-Bera tests
//! - **Control charts**: individuals and X̄-R limits
//!
//! # Modules
//!
//! - [`descriptive`]: Descriptive statistics for summarizing datasets
//! - [`percentiles`]: Quantile computation
//! - [`distribution`]: Tail probabilities for test statistics
//! - [`correlation`]: Linear association measures
//! - [`regression`]: Ordinary least squares
//! - [`normality`]: Goodness-of-fit tests against the normal distribution
//! - [`control`]: Shewhart control limits
//!
//! # Examples
//!
//! ## Computing descriptive statistics
//!
//! ```
//! use tabstat_stats::descriptive::DescriptiveStats;
//!
//! let stats = DescriptiveStats::new(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
//! assert_eq!(stats.mean, 3.0);
//! assert_eq!(stats.median, 3.0);
//! ```
//!
//! ## Testing a correlation
//!
//! ```
//! use tabstat_stats::correlation::{pearson, pearson_p_value};
//!
//! let x = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
//! let y = [1.1, 2.3, 2.9, 4.2, 4.8, 6.1];
//! let r = pearson(&x, &y).unwrap();
//! assert!(r > 0.99);
//! assert!(pearson_p_value(r, x.len()) < 0.01);
//! ```
//!
//! ## Fitting a line
//!
//! ```
//! use tabstat_stats::regression::SimpleFit;
//!
//! let fit = SimpleFit::fit(&[0.0, 1.0, 2.0], &[1.0, 3.0, 5.0]).unwrap();
//! assert!((fit.slope - 2.0).abs() < 1e-12);
//! ```

pub mod control;
pub mod correlation;
pub mod descriptive;
pub mod distribution;
pub mod normality;
pub mod percentiles;
pub mod regression;
