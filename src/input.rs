use std::collections::HashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ButtonState {
    Pressed,
    Down,
    Released,
    Up,
}

impl Default for ButtonState {
    fn default() -> Self {
        ButtonState::Up
    }
}

impl ButtonState {
    fn transition(&self, button_down: bool) -> ButtonState {
        if button_down {
            match self {
                ButtonState::Pressed => ButtonState::Down,
                ButtonState::Down => ButtonState::Down,
                ButtonState::Released => ButtonState::Pressed,
                ButtonState::Up => ButtonState::Pressed,
            }
        } else {
            match self {
                ButtonState::Pressed => ButtonState::Released,
                ButtonState::Down => ButtonState::Released,
                ButtonState::Released => ButtonState::Up,
                ButtonState::Up => ButtonState::Up,
            }
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, ButtonState::Pressed | ButtonState::Down)
    }
}

// ---------------------------------------------------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HorizontalDir {
    West,
    East,
}

impl HorizontalDir {
    pub fn invert(&self) -> HorizontalDir {
        match self {
            HorizontalDir::West => HorizontalDir::East,
            HorizontalDir::East => HorizontalDir::West,
        }
    }

    /// -1 for West, +1 for East
    pub fn sign(&self) -> f32 {
        match self {
            HorizontalDir::West => -1.0,
            HorizontalDir::East => 1.0,
        }
    }

    /// The direction of travel for a horizontal velocity; None when at rest.
    pub fn of_velocity(velocity: f32) -> Option<HorizontalDir> {
        if velocity < 0.0 {
            Some(HorizontalDir::West)
        } else if velocity > 0.0 {
            Some(HorizontalDir::East)
        } else {
            None
        }
    }

    /// True if a body moving at `velocity` is travelling this way. A body at rest agrees with
    /// either direction.
    pub fn agrees_with(&self, velocity: f32) -> bool {
        match self {
            HorizontalDir::West => velocity <= 0.0,
            HorizontalDir::East => velocity >= 0.0,
        }
    }
}

// ---------------------------------------------------------------------------------------------------------------------

/// What the motion controller reads from input on a given tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputSnapshot {
    // None when neither or both of left/right are held
    pub horizontal: Option<HorizontalDir>,
    pub run: bool,
    pub jump: ButtonState,
}

impl InputSnapshot {
    pub fn new(horizontal: Option<HorizontalDir>, run: bool, jump: ButtonState) -> Self {
        Self {
            horizontal,
            run,
            jump,
        }
    }

    pub fn moving(dir: HorizontalDir) -> Self {
        Self::new(Some(dir), false, ButtonState::Up)
    }

    pub fn with_run(self, run: bool) -> Self {
        Self { run, ..self }
    }

    pub fn with_jump(self, jump: ButtonState) -> Self {
        Self { jump, ..self }
    }

    pub fn jump_held(&self) -> bool {
        self.jump.is_active()
    }

    pub fn jump_just_pressed(&self) -> bool {
        self.jump == ButtonState::Pressed
    }

    pub fn jump_just_released(&self) -> bool {
        self.jump == ButtonState::Released
    }
}

// ---------------------------------------------------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Button {
    Left,
    Right,
    Run,
    Jump,
}

impl Button {
    pub const ALL: [Button; 4] = [Button::Left, Button::Right, Button::Run, Button::Jump];
}

/// Tracks edge-aware state for the controller's buttons. Whoever owns the input device calls
/// `process_button` as raw up/down signals arrive, reads a `snapshot` for the tick, then calls
/// `update` once all input for the tick has been consumed.
#[derive(Debug, Clone)]
pub struct InputState {
    buttons: HashMap<Button, ButtonState>,
}

impl Default for InputState {
    fn default() -> Self {
        let mut buttons = HashMap::new();
        for button in &Button::ALL {
            buttons.insert(*button, ButtonState::default());
        }

        Self { buttons }
    }
}

impl InputState {
    pub fn get_button_state(&self, button: Button) -> ButtonState {
        self.buttons.get(&button).copied().unwrap_or_default()
    }

    pub fn process_button(&mut self, button: Button, down: bool) {
        let new_state = self.get_button_state(button).transition(down);
        self.buttons.insert(button, new_state);
    }

    pub fn update(&mut self) {
        let previous_button_state = std::mem::take(&mut self.buttons);
        for (button, button_state) in previous_button_state {
            self.buttons
                .insert(button, button_state.transition(button_state.is_active()));
        }
    }

    pub fn snapshot(&self) -> InputSnapshot {
        InputSnapshot {
            horizontal: horizontal_intent(
                self.get_button_state(Button::Left),
                self.get_button_state(Button::Right),
            ),
            run: self.get_button_state(Button::Run).is_active(),
            jump: self.get_button_state(Button::Jump),
        }
    }
}

/// Folds left/right button states into a direction; holding both (or neither) cancels out.
pub fn horizontal_intent(left: ButtonState, right: ButtonState) -> Option<HorizontalDir> {
    match (left.is_active(), right.is_active()) {
        (true, false) => Some(HorizontalDir::West),
        (false, true) => Some(HorizontalDir::East),
        _ => None,
    }
}

// ---------------------------------------------------------------------------------------------------------------------
