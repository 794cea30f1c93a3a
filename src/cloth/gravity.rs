use crate::math::Vector3;

/// Owns a cloth body's gravity vector and a stack of scoped overrides.
///
/// The warm-start path pushes a temporary zero-gravity override; the RAII
/// guard pops it when the scope ends, including on unwind, so callers can
/// never forget to restore the base value.
#[derive(Debug, Clone)]
pub struct GravityController {
    base: Vector3,
    overrides: Vec<Vector3>,
}

impl GravityController {
    /// Creates a controller with the given base gravity
    pub fn new(base: Vector3) -> Self {
        Self {
            base,
            overrides: Vec::new(),
        }
    }

    /// The gravity in effect: the innermost override, or the base vector
    #[inline]
    pub fn current(&self) -> Vector3 {
        *self.overrides.last().unwrap_or(&self.base)
    }

    /// Returns the base gravity, ignoring overrides
    #[inline]
    pub fn base(&self) -> Vector3 {
        self.base
    }

    /// Updates the base gravity; non-finite components are ignored
    pub fn set_base(&mut self, gravity: Vector3) {
        if gravity.x.is_finite() && gravity.y.is_finite() && gravity.z.is_finite() {
            self.base = gravity;
        }
    }

    /// Pushes an override that lasts as long as the returned guard
    pub fn override_scope(&mut self, gravity: Vector3) -> GravityScope<'_> {
        self.overrides.push(gravity);
        GravityScope { controller: self }
    }
}

/// Guard for a scoped gravity override; pops the override on drop
#[derive(Debug)]
pub struct GravityScope<'a> {
    controller: &'a mut GravityController,
}

impl GravityScope<'_> {
    /// The gravity in effect inside this scope
    #[inline]
    pub fn current(&self) -> Vector3 {
        self.controller.current()
    }
}

impl Drop for GravityScope<'_> {
    fn drop(&mut self) {
        self.controller.overrides.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_restores_on_drop() {
        let base = Vector3::new(0.0, -9.81, 0.0);
        let mut controller = GravityController::new(base);
        {
            let scope = controller.override_scope(Vector3::zero());
            assert_eq!(scope.current(), Vector3::zero());
        }
        assert_eq!(controller.current(), base);
    }

    #[test]
    fn overrides_nest_like_a_stack() {
        let mut controller = GravityController::new(Vector3::new(0.0, -9.81, 0.0));
        let scope = controller.override_scope(Vector3::zero());
        assert_eq!(scope.current(), Vector3::zero());
        drop(scope);
        let scope = controller.override_scope(Vector3::new(0.0, -1.0, 0.0));
        assert_eq!(scope.current(), Vector3::new(0.0, -1.0, 0.0));
        drop(scope);
        assert_eq!(controller.current(), Vector3::new(0.0, -9.81, 0.0));
    }
}
