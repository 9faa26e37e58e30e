use crate::prelude::SmootherSeed;

/// Single-pole exponential smoother over the median stream.
///
/// The state stays unset until the first [`update`](Self::update). With
/// [`SmootherSeed::FirstMedian`] that first input becomes the state as is;
/// with [`SmootherSeed::Fixed`] the first input is blended into the fixed seed.
#[derive(Debug, Clone)]
pub struct ExponentialSmoother {
    alpha: f32,
    seed: SmootherSeed,
    state: Option<f32>,
}

impl ExponentialSmoother {
    pub fn new(alpha: f32, seed: SmootherSeed) -> Self {
        debug_assert!(
            alpha > 0.0 && alpha <= 1.0,
            "smoothing factor must lie in (0, 1], got {}",
            alpha
        );
        Self {
            alpha,
            seed,
            state: None,
        }
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn value(&self) -> Option<f32> {
        self.state
    }

    pub fn update(&mut self, input: f32) -> f32 {
        let previous = match (self.state, self.seed) {
            (Some(previous), _) => previous,
            (None, SmootherSeed::FirstMedian) => {
                self.state = Some(input);
                return input;
            }
            (None, SmootherSeed::Fixed(seed)) => seed,
        };
        let next = self.alpha * input + (1.0 - self.alpha) * previous;
        self.state = Some(next);
        next
    }
}
