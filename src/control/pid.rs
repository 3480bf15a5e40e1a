use std::f64::consts::{PI, TAU};

/// Wraps an angle into `(-PI, PI]`.
pub fn wrap_angle(angle: f64) -> f64 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped == -PI { PI } else { wrapped }
}

/// PID on heading error, stepping once per simulation tick.
pub struct HeadingPid {
    kp: f64,
    ki: f64,
    kd: f64,
    integral: f64,
    previous_error: Option<f64>,
    output_limit: f64,
}

impl HeadingPid {
    pub fn new(kp: f64, ki: f64, kd: f64) -> Self {
        Self {
            kp,
            ki,
            kd,
            integral: 0.0,
            previous_error: None,
            output_limit: f64::INFINITY,
        }
    }

    /// Output is clamped to `[-limit, limit]`; the integral is held inside the same band.
    pub fn with_output_limit(mut self, limit: f64) -> Self {
        self.output_limit = limit.abs();
        self
    }

    pub fn reset(&mut self) {
        self.integral = 0.0;
        self.previous_error = None;
    }

    pub fn integral(&self) -> f64 {
        self.integral
    }

    pub fn update(&mut self, desired: f64, current: f64) -> f64 {
        let error = wrap_angle(desired - current);

        self.integral += error;
        if self.ki != 0.0 {
            let bound = self.output_limit / self.ki.abs();
            self.integral = self.integral.clamp(-bound, bound);
        }

        // no kick on the first tick after a reset
        let derivative = self
            .previous_error
            .map_or(0.0, |previous| wrap_angle(error - previous));
        self.previous_error = Some(error);

        let raw = self.kp * error + self.ki * self.integral + self.kd * derivative;
        raw.clamp(-self.output_limit, self.output_limit)
    }
}
