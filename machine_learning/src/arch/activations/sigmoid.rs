/// The logistic function scaled by `amp`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sigmoid {
    amp: f32,
}

impl Default for Sigmoid {
    fn default() -> Self {
        Self { amp: 1. }
    }
}

impl Sigmoid {
    pub fn new(amp: f32) -> Self {
        Self { amp }
    }

    pub fn f(&self, z: f32) -> f32 {
        self.amp * sigmoid(z)
    }

    pub fn df(&self, z: f32) -> f32 {
        let s = sigmoid(z);
        self.amp * s * (1. - s)
    }
}

/// Numerically stable logistic function, never evaluates `exp` of a positive number.
pub fn sigmoid(z: f32) -> f32 {
    if z >= 0. {
        1. / (1. + (-z).exp())
    } else {
        let e = z.exp();
        e / (1. + e)
    }
}
