/// The logistic (sigmoid) activation used by every neuron.
pub struct Logistic;

impl Logistic {
    /// 1 / (1 + e^-x)
    pub fn function(x: f64) -> f64 {
        1.0 / (1.0 + (-x).exp())
    }

    /// Derivative expressed through the activation's own output:
    /// f'(x) = f(x) * (1 - f(x)).
    ///
    /// Takes `f_x`, not `x`. Backprop only keeps the activated output around,
    /// so this is the form the rest of the crate calls.
    pub fn derivative(f_x: f64) -> f64 {
        f_x * (1.0 - f_x)
    }
}
