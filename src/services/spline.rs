/// Natural cubic spline interpolation over a set of knots.
///
/// Used to resample the cumulative PnL series into an evenly spaced curve
/// for rendering. "Natural" boundary conditions: the second derivative is
/// zero at both end knots, so the fit degrades gracefully to a straight
/// line for two points and to the exact line for collinear input.
#[derive(Debug, Clone)]
pub struct CubicSpline {
    xs: Vec<f64>,
    ys: Vec<f64>,
    /// Second derivative of the interpolant at each knot.
    second_derivs: Vec<f64>,
}

impl CubicSpline {
    /// Fit a natural cubic spline through the given knots.
    ///
    /// Requires at least 2 knots with strictly increasing, finite x
    /// values; returns `None` otherwise. The interior second derivatives
    /// come from the standard tridiagonal system, solved with a forward
    /// sweep and back substitution.
    pub fn fit(xs: &[f64], ys: &[f64]) -> Option<Self> {
        if xs.len() != ys.len() || xs.len() < 2 {
            return None;
        }
        if xs.iter().any(|x| !x.is_finite()) || ys.iter().any(|y| !y.is_finite()) {
            return None;
        }
        if xs.windows(2).any(|w| w[1] <= w[0]) {
            return None;
        }

        let n = xs.len();
        let mut second_derivs = vec![0.0; n];
        let mut sweep = vec![0.0; n - 1];

        // Forward sweep over interior knots. Natural boundary leaves
        // second_derivs[0] and second_derivs[n-1] at zero.
        for i in 1..n - 1 {
            let sig = (xs[i] - xs[i - 1]) / (xs[i + 1] - xs[i - 1]);
            let p = sig * second_derivs[i - 1] + 2.0;
            second_derivs[i] = (sig - 1.0) / p;

            let slope_right = (ys[i + 1] - ys[i]) / (xs[i + 1] - xs[i]);
            let slope_left = (ys[i] - ys[i - 1]) / (xs[i] - xs[i - 1]);
            let rhs = slope_right - slope_left;
            sweep[i] = (6.0 * rhs / (xs[i + 1] - xs[i - 1]) - sig * sweep[i - 1]) / p;
        }

        // Back substitution.
        for i in (0..n - 1).rev() {
            second_derivs[i] = second_derivs[i] * second_derivs[i + 1] + sweep[i];
        }

        Some(Self {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
            second_derivs,
        })
    }

    /// Evaluate the interpolant at `x`.
    ///
    /// Values outside the knot range are extrapolated with the nearest
    /// boundary segment; resampling only ever evaluates inside the range.
    pub fn eval(&self, x: f64) -> f64 {
        let n = self.xs.len();
        let i = match self.xs.partition_point(|&knot| knot <= x) {
            0 => 0,
            p => (p - 1).min(n - 2),
        };

        let h = self.xs[i + 1] - self.xs[i];
        let a = (self.xs[i + 1] - x) / h;
        let b = (x - self.xs[i]) / h;

        a * self.ys[i]
            + b * self.ys[i + 1]
            + ((a * a * a - a) * self.second_derivs[i]
                + (b * b * b - b) * self.second_derivs[i + 1])
                * (h * h)
                / 6.0
    }

    /// Sample the interpolant at `samples` evenly spaced x positions from
    /// the first to the last knot, endpoints exact.
    pub fn resample(&self, samples: usize) -> Vec<(f64, f64)> {
        if samples == 0 {
            return Vec::new();
        }

        let x_min = self.xs[0];
        let x_max = self.xs[self.xs.len() - 1];
        let span = x_max - x_min;

        (0..samples)
            .map(|i| {
                let x = if i + 1 == samples {
                    x_max
                } else {
                    x_min + span * i as f64 / (samples - 1) as f64
                };
                (x, self.eval(x))
            })
            .collect()
    }
}
