//! Hardware abstraction traits
//!
//! The servo, buzzer, and power rail are external collaborators behind
//! narrow seams: the state machine drives them, boards implement them.
//! They are infallible by design - the device models no hardware
//! failure, and every boundary condition in the logic layer resolves by
//! saturation with at most an audible click.

/// Hobby servo emulating the stepping foot.
pub trait ServoActuator {
    /// Power the servo output and drive the last commanded position.
    fn attach(&mut self);

    /// Stop driving the servo; the output line goes idle.
    fn detach(&mut self);

    /// Command a position in degrees (0-180).
    fn set_position(&mut self, degrees: u8);
}

/// On/off audio emitter.
pub trait Buzzer {
    /// Turn the buzzer on (continuous tone).
    fn ring(&mut self);

    /// Turn the buzzer off.
    fn mute(&mut self);

    /// Emit one short click (brief toggle, then restore).
    fn click(&mut self);
}

/// External power rail and low-power sleep.
pub trait PowerControl {
    /// Enable the rail feeding the display, servo, and buzzer.
    fn power_on(&mut self);

    /// Drop the external rail.
    fn power_off(&mut self);

    /// Halt until the designated wake edge (the encoder button) fires.
    ///
    /// Blocks the entire loop; on return the caller restarts as if
    /// freshly initialized.
    fn sleep_until_wake(&mut self);
}
