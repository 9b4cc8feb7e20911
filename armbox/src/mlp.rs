//! Backend-free multilayer perceptron.
use ndarray::{Array1, Array2};
use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

/// Configuration of [`Mlp`].
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct MlpConfig {
    /// Hidden layer sizes.
    pub units: Vec<usize>,
}

impl Default for MlpConfig {
    fn default() -> Self {
        Self { units: vec![32, 32] }
    }
}

/// Multilayer perceptron with ReLU activations and a `[0, 1]` output range.
///
/// The output layer applies `0.5 * (tanh(x) + 1)` so the network can be used
/// directly as a muscle control signal. Weights are plain [`ndarray`]
/// matrices; no tensor backend is involved.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Mlp {
    /// Weights of layers.
    ws: Vec<Array2<f64>>,

    /// Biases of layers.
    bs: Vec<Array1<f64>>,
}

impl Mlp {
    /// Constructs a randomly initialized network.
    pub fn new<R: Rng>(in_dim: usize, config: &MlpConfig, out_dim: usize, rng: &mut R) -> Self {
        let mut dims = vec![in_dim];
        dims.extend(&config.units);
        dims.push(out_dim);

        let mut ws = Vec::with_capacity(dims.len() - 1);
        let mut bs = Vec::with_capacity(dims.len() - 1);
        for pair in dims.windows(2) {
            let (n_in, n_out) = (pair[0], pair[1]);
            let s = 1.0 / (n_in as f64).sqrt();
            ws.push(Array2::from_shape_fn((n_out, n_in), |_| {
                rng.gen_range(-s..s)
            }));
            bs.push(Array1::zeros(n_out));
        }
        Self { ws, bs }
    }

    /// Forward pass.
    pub fn forward(&self, x: &Array1<f64>) -> Array1<f64> {
        let n_layers = self.ws.len();
        let mut x = x.clone();
        for i in 0..n_layers {
            x = self.ws[i].dot(&x) + &self.bs[i];
            if i != n_layers - 1 {
                x.mapv_inplace(|v| v.max(0.0));
            }
        }
        x.mapv(|v| 0.5 * (v.tanh() + 1.0))
    }

    /// Returns a copy with Gaussian noise added to every parameter.
    pub fn perturbed<R: Rng>(&self, noise: &Normal<f64>, rng: &mut R) -> Self {
        Self {
            ws: self
                .ws
                .iter()
                .map(|w| w.mapv(|v| v + noise.sample(rng)))
                .collect(),
            bs: self
                .bs
                .iter()
                .map(|b| b.mapv(|v| v + noise.sample(rng)))
                .collect(),
        }
    }

    /// Output dimension of the network.
    pub fn out_dim(&self) -> usize {
        self.bs.last().map(|b| b.len()).unwrap_or(0)
    }
}
