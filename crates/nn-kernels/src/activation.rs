// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Activation functions.
//!
//! Kernels depend only on the [`Activate`] capability: something that
//! overwrites a slice in place. [`Activation`] is the set of concrete,
//! serializable variants; any `Fn(&mut [f32])` closure works too.

use crate::LayerError;

/// An in-place transform over a run of values.
///
/// Elementwise functions apply independently per value; global functions
/// such as softmax treat the whole slice as one vector.
pub trait Activate {
    /// Overwrites `x` with the activated values.
    fn apply(&self, x: &mut [f32]);
}

impl<F: Fn(&mut [f32])> Activate for F {
    fn apply(&self, x: &mut [f32]) {
        self(x)
    }
}

/// Concrete activation variants.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    /// `y = x`.
    #[default]
    Linear,
    /// `y = max(x, 0)`.
    Relu,
    /// `y = exp(x)`.
    Exponential,
    /// Piecewise-linear sigmoid: `0` below -2.5, `1` above 2.5, `0.2x + 0.5` between.
    HardSigmoid,
    Tanh,
    Sigmoid,
    /// Softmax over the whole slice.
    Softmax,
    /// `y = ln(1 + exp(x))`.
    Softplus,
    /// `y = x / (1 + |x|)`.
    Softsign,
    /// `y = alpha * x` for negative `x`.
    LeakyRelu { alpha: f32 },
    /// `y = alpha * (exp(x) - 1)` for negative `x`.
    Elu { alpha: f32 },
    /// `y = 0` for `x < theta`.
    ThresholdedRelu { theta: f32 },
    /// ReLU with a ceiling, a threshold and a slope below the threshold.
    ClippedRelu {
        max_value: f32,
        negative_slope: f32,
        threshold: f32,
    },
    /// Leaky ReLU with a learned slope per position.
    Prelu { alpha: Vec<f32> },
}

impl Activation {
    /// Validate activation parameters.
    pub fn validate(&self) -> Result<(), LayerError> {
        let finite = |name: &str, v: f32| {
            if v.is_finite() {
                Ok(())
            } else {
                Err(LayerError::Config(format!(
                    "{} parameter {name} must be finite, got {v}",
                    self.name()
                )))
            }
        };
        match self {
            Activation::LeakyRelu { alpha } | Activation::Elu { alpha } => finite("alpha", *alpha),
            Activation::ThresholdedRelu { theta } => finite("theta", *theta),
            Activation::ClippedRelu {
                max_value,
                negative_slope,
                threshold,
            } => {
                if max_value.is_nan() {
                    return Err(LayerError::Config("relu max_value is NaN".into()));
                }
                finite("negative_slope", *negative_slope)?;
                finite("threshold", *threshold)
            }
            Activation::Prelu { alpha } => {
                if alpha.is_empty() {
                    return Err(LayerError::Config("prelu alpha must not be empty".into()));
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Returns a human-readable label.
    pub fn name(&self) -> &'static str {
        match self {
            Activation::Linear => "linear",
            Activation::Relu => "relu",
            Activation::Exponential => "exponential",
            Activation::HardSigmoid => "hard_sigmoid",
            Activation::Tanh => "tanh",
            Activation::Sigmoid => "sigmoid",
            Activation::Softmax => "softmax",
            Activation::Softplus => "softplus",
            Activation::Softsign => "softsign",
            Activation::LeakyRelu { .. } => "leaky_relu",
            Activation::Elu { .. } => "elu",
            Activation::ThresholdedRelu { .. } => "thresholded_relu",
            Activation::ClippedRelu { .. } => "clipped_relu",
            Activation::Prelu { .. } => "prelu",
        }
    }
}

impl Activate for Activation {
    fn apply(&self, x: &mut [f32]) {
        match self {
            Activation::Linear => {}
            Activation::Relu => map(x, |v| if v <= 0.0 { 0.0 } else { v }),
            Activation::Exponential => map(x, f32::exp),
            Activation::HardSigmoid => map(x, |v| {
                if v <= -2.5 {
                    0.0
                } else if v >= 2.5 {
                    1.0
                } else {
                    0.2 * v + 0.5
                }
            }),
            Activation::Tanh => map(x, f32::tanh),
            Activation::Sigmoid => map(x, sigmoid),
            Activation::Softmax => softmax(x),
            Activation::Softplus => map(x, |v| v.exp().ln_1p()),
            Activation::Softsign => map(x, |v| v / (1.0 + v.abs())),
            Activation::LeakyRelu { alpha } => map(x, |v| if v < 0.0 { alpha * v } else { v }),
            Activation::Elu { alpha } => map(x, |v| if v < 0.0 { alpha * v.exp_m1() } else { v }),
            Activation::ThresholdedRelu { theta } => map(x, |v| if v < *theta { 0.0 } else { v }),
            Activation::ClippedRelu {
                max_value,
                negative_slope,
                threshold,
            } => map(x, |v| {
                if v >= *max_value {
                    *max_value
                } else if v < *threshold {
                    negative_slope * (v - threshold)
                } else {
                    v
                }
            }),
            Activation::Prelu { alpha } => {
                for (v, &a) in x.iter_mut().zip(alpha) {
                    if *v < 0.0 {
                        *v *= a;
                    }
                }
            }
        }
    }
}

#[inline]
fn map(x: &mut [f32], f: impl Fn(f32) -> f32) {
    x.iter_mut().for_each(|v| *v = f(*v));
}

#[inline]
fn sigmoid(x: f32) -> f32 {
    // Numerically stable sigmoid.
    if x >= 0.0 {
        let z = (-x).exp();
        1.0 / (1.0 + z)
    } else {
        let z = x.exp();
        z / (1.0 + z)
    }
}

/// Softmax over the whole slice, subtracting the maximum before
/// exponentiation to prevent overflow.
fn softmax(x: &mut [f32]) {
    if x.is_empty() {
        return;
    }
    let max_val = x.iter().copied().fold(f32::NEG_INFINITY, f32::max);

    let mut sum = 0.0f32;
    for v in x.iter_mut() {
        *v = (*v - max_val).exp();
        sum += *v;
    }

    if sum > 0.0 {
        let inv_sum = 1.0 / sum;
        x.iter_mut().for_each(|v| *v *= inv_sum);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: &[f32], b: &[f32], tol: f32) -> bool {
        a.len() == b.len() && a.iter().zip(b).all(|(x, y)| (x - y).abs() < tol)
    }

    fn run(act: &Activation, input: &[f32]) -> Vec<f32> {
        let mut x = input.to_vec();
        act.apply(&mut x);
        x
    }

    #[test]
    fn test_linear_is_identity() {
        assert_eq!(run(&Activation::Linear, &[-1.0, 0.0, 2.5]), vec![-1.0, 0.0, 2.5]);
    }

    #[test]
    fn test_relu_family() {
        assert_eq!(run(&Activation::Relu, &[-2.0, 0.0, 3.0]), vec![0.0, 0.0, 3.0]);
        assert_eq!(
            run(&Activation::LeakyRelu { alpha: 0.1 }, &[-2.0, 3.0]),
            vec![-0.2, 3.0]
        );
        assert_eq!(
            run(&Activation::ThresholdedRelu { theta: 1.0 }, &[0.5, 1.0, 2.0]),
            vec![0.0, 1.0, 2.0]
        );
        let clipped = Activation::ClippedRelu {
            max_value: 6.0,
            negative_slope: 0.5,
            threshold: 1.0,
        };
        assert_eq!(run(&clipped, &[-1.0, 3.0, 9.0]), vec![-1.0, 3.0, 6.0]);
    }

    #[test]
    fn test_prelu_uses_per_position_alpha() {
        let act = Activation::Prelu {
            alpha: vec![0.5, 2.0, 0.0],
        };
        assert_eq!(run(&act, &[-2.0, -1.0, 4.0]), vec![-1.0, -2.0, 4.0]);
    }

    #[test]
    fn test_sigmoid_basic_values() {
        let y = run(&Activation::Sigmoid, &[0.0, 10.0, -10.0]);
        assert!((y[0] - 0.5).abs() < 1e-6);
        assert!(y[1] > 0.999);
        assert!(y[2] < 0.001);
    }

    #[test]
    fn test_hard_sigmoid_segments() {
        let y = run(&Activation::HardSigmoid, &[-3.0, 0.0, 1.0, 3.0]);
        assert!(approx_eq(&y, &[0.0, 0.5, 0.7, 1.0], 1e-6));
    }

    #[test]
    fn test_smooth_functions() {
        let y = run(&Activation::Tanh, &[0.0, 1.0]);
        assert!(approx_eq(&y, &[0.0, 0.761_594_2], 1e-6));
        let y = run(&Activation::Softplus, &[0.0]);
        assert!(approx_eq(&y, &[std::f32::consts::LN_2], 1e-6));
        let y = run(&Activation::Softsign, &[1.0, -3.0]);
        assert!(approx_eq(&y, &[0.5, -0.75], 1e-6));
        let y = run(&Activation::Exponential, &[0.0, 1.0]);
        assert!(approx_eq(&y, &[1.0, std::f32::consts::E], 1e-6));
        let y = run(&Activation::Elu { alpha: 1.0 }, &[-1.0, 2.0]);
        assert!(approx_eq(&y, &[-0.632_120_6, 2.0], 1e-6));
    }

    #[test]
    fn test_softmax_sums_to_one() {
        let y = run(&Activation::Softmax, &[1.0, 2.0, 3.0, 4.0, 5.0]);
        let sum: f32 = y.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
        assert!(y.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_softmax_numerical_stability() {
        let y = run(&Activation::Softmax, &[1000.0, 1001.0, 1002.0]);
        let sum: f32 = y.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
        assert!(y.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_closure_is_an_activation() {
        let double = |x: &mut [f32]| x.iter_mut().for_each(|v| *v *= 2.0);
        let act: &dyn Activate = &double;
        let mut x = [1.0, -2.0];
        act.apply(&mut x);
        assert_eq!(x, [2.0, -4.0]);
    }

    #[test]
    fn test_validate() {
        assert!(Activation::LeakyRelu { alpha: f32::NAN }.validate().is_err());
        assert!(Activation::Prelu { alpha: vec![] }.validate().is_err());
        assert!(Activation::ClippedRelu {
            max_value: f32::INFINITY,
            negative_slope: 0.0,
            threshold: 0.0
        }
        .validate()
        .is_ok());
        assert!(Activation::Tanh.validate().is_ok());
    }

    #[test]
    fn test_serde_names() {
        #[derive(serde::Deserialize)]
        struct Wrapper {
            act: Activation,
        }
        let w: Wrapper = toml::from_str("act = \"hard_sigmoid\"").unwrap();
        assert_eq!(w.act, Activation::HardSigmoid);
        let w: Wrapper = toml::from_str("act = { leaky_relu = { alpha = 0.25 } }").unwrap();
        assert_eq!(w.act, Activation::LeakyRelu { alpha: 0.25 });
    }
}
