//! A two-level (group -> leaf) state machine with an optional timed fallback transition.
//!
//! States are plain `Copy` values - usually an enum - implementing [`State`]. The machine only
//! tracks which state is current; behavior lives in a [`StateHandler`] passed to every call
//! that can fire callbacks, so the handler can borrow whatever world data the tick needs.

use std::fmt::Debug;
use std::time::Duration;

pub trait State: Copy + Eq + Debug {
    type Group: Copy + Eq + Debug;

    /// The group this state belongs to, or None for a standalone state.
    fn group(&self) -> Option<Self::Group>;

    /// A group root is a placeholder meaning "somewhere in this group"; it has no leaf
    /// behavior of its own and expects the group's update to replace it with a real leaf.
    fn is_group_root(&self) -> bool {
        false
    }
}

/// Which callback scope is being entered, updated or exited.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scope<S: State> {
    Group(S::Group),
    Leaf(S),
}

pub trait StateHandler<S: State> {
    fn on_enter(&mut self, _scope: Scope<S>) {}

    fn on_update(&mut self, _scope: Scope<S>, _machine: &mut StateMachine<S>, _dt: Duration) {}

    fn on_exit(&mut self, _scope: Scope<S>) {}
}

// ---------------------------------------------------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct PendingTransition<S> {
    target: S,
    remaining: Duration,
}

#[derive(Clone, Debug)]
pub struct StateMachine<S: State> {
    name: &'static str,
    current: Option<S>,
    pending: Option<PendingTransition<S>>,
}

impl<S: State> StateMachine<S> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            current: None,
            pending: None,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn current_state(&self) -> Option<S> {
        self.current
    }

    pub fn current_group(&self) -> Option<S::Group> {
        self.current.and_then(|s| s.group())
    }

    pub fn is_current_state(&self, state: S) -> bool {
        self.current == Some(state)
    }

    /// The scheduled fallback target and the time left before it fires, if any.
    pub fn pending_transition(&self) -> Option<(S, Duration)> {
        self.pending.map(|p| (p.target, p.remaining))
    }

    /// Drops any scheduled transition. Returns true if one was pending; calling this when
    /// nothing is scheduled is a no-op.
    pub fn cancel_pending(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Transitions to `state`, firing exit callbacks for what's being left and enter callbacks
    /// for what's being entered. Returns false (and fires nothing) if `state` is already current.
    pub fn set_state<H: StateHandler<S>>(&mut self, state: S, handler: &mut H) -> bool {
        self.transition(state, None, handler)
    }

    /// Like `set_state`, but also schedules a transition to `next` after `delay`. Any later
    /// transition cancels the scheduled one.
    pub fn set_state_then<H: StateHandler<S>>(
        &mut self,
        state: S,
        delay: Duration,
        next: S,
        handler: &mut H,
    ) -> bool {
        self.transition(state, Some((delay, next)), handler)
    }

    fn transition<H: StateHandler<S>>(
        &mut self,
        state: S,
        fallback: Option<(Duration, S)>,
        handler: &mut H,
    ) -> bool {
        if self.current == Some(state) {
            return false;
        }

        let previous = self.current;
        let previous_group = previous.and_then(|s| s.group());
        let next_group = state.group();

        if let Some(previous) = previous {
            handler.on_exit(Scope::Leaf(previous));
        }
        if let Some(group) = previous_group {
            if next_group != Some(group) {
                handler.on_exit(Scope::Group(group));
            }
        }

        match fallback {
            Some((delay, next)) if delay > Duration::ZERO => log::debug!(
                "[StateMachine {}] {:?} => {:?} (then {:?} in {:?})",
                self.name,
                previous,
                state,
                next,
                delay
            ),
            _ => log::debug!("[StateMachine {}] {:?} => {:?}", self.name, previous, state),
        }

        self.cancel_pending();
        self.current = Some(state);

        if let Some((delay, next)) = fallback {
            if delay > Duration::ZERO {
                self.pending = Some(PendingTransition {
                    target: next,
                    remaining: delay,
                });
            }
        }

        if let Some(group) = next_group {
            if previous_group != Some(group) {
                handler.on_enter(Scope::Group(group));
            }
        }
        handler.on_enter(Scope::Leaf(state));

        true
    }

    /// Advances the pending countdown by `dt` (firing it if it expires), then runs the current
    /// group's update followed by the current leaf's update. The leaf is re-read after the group
    /// update, so a transition made by the group is visible to the leaf step of the same tick.
    pub fn update<H: StateHandler<S>>(&mut self, dt: Duration, handler: &mut H) {
        self.advance_pending(dt, handler);

        let state = match self.current {
            Some(state) => state,
            None => return,
        };

        if let Some(group) = state.group() {
            handler.on_update(Scope::Group(group), self, dt);
        }

        let current = match self.current {
            Some(current) => current,
            None => return,
        };

        if current.is_group_root() {
            // A group update that moved us onto another group's root hands the rest of the
            // tick to that group so it can settle on a leaf.
            if let Some(group) = current.group() {
                if state.group() != Some(group) {
                    handler.on_update(Scope::Group(group), self, dt);
                }
            }
        } else {
            handler.on_update(Scope::Leaf(current), self, dt);
        }
    }

    fn advance_pending<H: StateHandler<S>>(&mut self, dt: Duration, handler: &mut H) {
        let expired = match self.pending.as_mut() {
            Some(pending) => {
                pending.remaining = pending.remaining.saturating_sub(dt);
                pending.remaining == Duration::ZERO
            }
            None => false,
        };

        if expired {
            if let Some(pending) = self.pending.take() {
                self.set_state(pending.target, handler);
            }
        }
    }
}

// ---------------------------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    enum Group {
        Ground,
        Air,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    enum TestState {
        Menu,
        GroundRoot,
        Idle,
        Walk,
        Run,
        AirRoot,
        Jump,
    }

    impl State for TestState {
        type Group = Group;

        fn group(&self) -> Option<Group> {
            match self {
                TestState::Menu => None,
                TestState::GroundRoot | TestState::Idle | TestState::Walk | TestState::Run => {
                    Some(Group::Ground)
                }
                TestState::AirRoot | TestState::Jump => Some(Group::Air),
            }
        }

        fn is_group_root(&self) -> bool {
            matches!(self, TestState::GroundRoot | TestState::AirRoot)
        }
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    enum Event {
        Enter(Scope<TestState>),
        Update(Scope<TestState>),
        Exit(Scope<TestState>),
    }

    #[derive(Default)]
    struct Recorder {
        events: Vec<Event>,
        // transitions requested from group updates, keyed by the group doing the update
        on_ground_update: Option<TestState>,
        on_air_update: Option<TestState>,
    }

    impl Recorder {
        fn count(&self, event: Event) -> usize {
            self.events.iter().filter(|e| **e == event).count()
        }
    }

    impl StateHandler<TestState> for Recorder {
        fn on_enter(&mut self, scope: Scope<TestState>) {
            self.events.push(Event::Enter(scope));
        }

        fn on_update(
            &mut self,
            scope: Scope<TestState>,
            machine: &mut StateMachine<TestState>,
            _dt: Duration,
        ) {
            self.events.push(Event::Update(scope));
            let redirect = match scope {
                Scope::Group(Group::Ground) => self.on_ground_update.take(),
                Scope::Group(Group::Air) => self.on_air_update.take(),
                Scope::Leaf(_) => None,
            };
            if let Some(target) = redirect {
                machine.set_state(target, self);
            }
        }

        fn on_exit(&mut self, scope: Scope<TestState>) {
            self.events.push(Event::Exit(scope));
        }
    }

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn callbacks_nest_group_around_leaf() {
        let mut machine = StateMachine::new("test");
        let mut recorder = Recorder::default();

        machine.set_state(TestState::Menu, &mut recorder);
        machine.set_state(TestState::Walk, &mut recorder);
        machine.set_state(TestState::Jump, &mut recorder);

        assert_eq!(
            recorder.events,
            vec![
                Event::Enter(Scope::Leaf(TestState::Menu)),
                Event::Exit(Scope::Leaf(TestState::Menu)),
                Event::Enter(Scope::Group(Group::Ground)),
                Event::Enter(Scope::Leaf(TestState::Walk)),
                Event::Exit(Scope::Leaf(TestState::Walk)),
                Event::Exit(Scope::Group(Group::Ground)),
                Event::Enter(Scope::Group(Group::Air)),
                Event::Enter(Scope::Leaf(TestState::Jump)),
            ]
        );
        assert_eq!(machine.current_group(), Some(Group::Air));
    }

    #[test]
    fn group_entered_once_across_leaf_transitions() {
        let mut machine = StateMachine::new("test");
        let mut recorder = Recorder::default();

        machine.set_state(TestState::Walk, &mut recorder);
        machine.set_state(TestState::Run, &mut recorder);
        machine.set_state(TestState::Walk, &mut recorder);
        machine.set_state(TestState::Idle, &mut recorder);

        assert_eq!(recorder.count(Event::Enter(Scope::Group(Group::Ground))), 1);
        assert_eq!(recorder.count(Event::Exit(Scope::Group(Group::Ground))), 0);
        assert_eq!(recorder.count(Event::Enter(Scope::Leaf(TestState::Walk))), 2);
    }

    #[test]
    fn setting_current_state_is_a_no_op() {
        let mut machine = StateMachine::new("test");
        let mut recorder = Recorder::default();

        machine.set_state_then(TestState::Run, ms(100), TestState::Walk, &mut recorder);
        let events_before = recorder.events.len();

        assert!(!machine.set_state(TestState::Run, &mut recorder));
        assert_eq!(recorder.events.len(), events_before);
        assert_eq!(
            machine.pending_transition(),
            Some((TestState::Walk, ms(100)))
        );
    }

    #[test]
    fn timed_transition_fires_exactly_once() {
        let mut machine = StateMachine::new("test");
        let mut recorder = Recorder::default();

        machine.set_state_then(TestState::Run, ms(100), TestState::Walk, &mut recorder);
        machine.update(ms(60), &mut recorder);
        assert!(machine.is_current_state(TestState::Run));
        assert_eq!(
            machine.pending_transition(),
            Some((TestState::Walk, ms(40)))
        );

        machine.update(ms(60), &mut recorder);
        assert!(machine.is_current_state(TestState::Walk));
        assert_eq!(machine.pending_transition(), None);

        for _ in 0..10 {
            machine.update(ms(60), &mut recorder);
        }
        assert_eq!(recorder.count(Event::Enter(Scope::Leaf(TestState::Walk))), 1);
    }

    #[test]
    fn any_transition_cancels_the_timer() {
        let mut machine = StateMachine::new("test");
        let mut recorder = Recorder::default();

        machine.set_state_then(TestState::Run, ms(100), TestState::Walk, &mut recorder);
        machine.set_state(TestState::Idle, &mut recorder);
        machine.set_state(TestState::Run, &mut recorder);

        for _ in 0..10 {
            machine.update(ms(50), &mut recorder);
        }
        assert!(machine.is_current_state(TestState::Run));
        assert_eq!(recorder.count(Event::Enter(Scope::Leaf(TestState::Walk))), 0);
    }

    #[test]
    fn transition_to_the_fallback_target_still_cancels_it() {
        let mut machine = StateMachine::new("test");
        let mut recorder = Recorder::default();

        machine.set_state_then(TestState::Run, ms(100), TestState::Walk, &mut recorder);
        machine.set_state(TestState::Walk, &mut recorder);
        machine.set_state(TestState::Idle, &mut recorder);

        for _ in 0..10 {
            machine.update(ms(50), &mut recorder);
        }
        assert!(machine.is_current_state(TestState::Idle));
        assert_eq!(recorder.count(Event::Enter(Scope::Leaf(TestState::Walk))), 1);
    }

    #[test]
    fn zero_delay_schedules_nothing() {
        let mut machine = StateMachine::new("test");
        let mut recorder = Recorder::default();

        machine.set_state_then(TestState::Run, Duration::ZERO, TestState::Walk, &mut recorder);
        assert_eq!(machine.pending_transition(), None);
    }

    #[test]
    fn cancel_pending_is_idempotent() {
        let mut machine = StateMachine::new("test");
        let mut recorder = Recorder::default();

        assert!(!machine.cancel_pending());
        machine.set_state_then(TestState::Run, ms(100), TestState::Walk, &mut recorder);
        assert!(machine.cancel_pending());
        assert!(!machine.cancel_pending());

        machine.update(ms(200), &mut recorder);
        assert!(machine.is_current_state(TestState::Run));
    }

    #[test]
    fn update_runs_group_then_leaf() {
        let mut machine = StateMachine::new("test");
        let mut recorder = Recorder::default();

        machine.set_state(TestState::Walk, &mut recorder);
        recorder.events.clear();
        machine.update(ms(16), &mut recorder);

        assert_eq!(
            recorder.events,
            vec![
                Event::Update(Scope::Group(Group::Ground)),
                Event::Update(Scope::Leaf(TestState::Walk)),
            ]
        );
    }

    #[test]
    fn leaf_update_sees_transition_made_by_group() {
        let mut machine = StateMachine::new("test");
        let mut recorder = Recorder::default();

        machine.set_state(TestState::Walk, &mut recorder);
        recorder.on_ground_update = Some(TestState::Run);
        recorder.events.clear();
        machine.update(ms(16), &mut recorder);

        assert_eq!(
            recorder.events,
            vec![
                Event::Update(Scope::Group(Group::Ground)),
                Event::Exit(Scope::Leaf(TestState::Walk)),
                Event::Enter(Scope::Leaf(TestState::Run)),
                Event::Update(Scope::Leaf(TestState::Run)),
            ]
        );
    }

    #[test]
    fn new_group_settles_its_leaf_on_the_same_tick() {
        let mut machine = StateMachine::new("test");
        let mut recorder = Recorder::default();

        machine.set_state(TestState::Walk, &mut recorder);
        recorder.on_ground_update = Some(TestState::AirRoot);
        recorder.on_air_update = Some(TestState::Jump);
        machine.update(ms(16), &mut recorder);

        assert!(machine.is_current_state(TestState::Jump));
        assert_eq!(recorder.count(Event::Update(Scope::Group(Group::Air))), 1);
        assert_eq!(recorder.count(Event::Enter(Scope::Group(Group::Air))), 1);
    }

    #[test]
    fn resting_in_a_group_root_only_runs_the_group_update() {
        let mut machine = StateMachine::new("test");
        let mut recorder = Recorder::default();

        machine.set_state(TestState::AirRoot, &mut recorder);
        recorder.events.clear();
        machine.update(ms(16), &mut recorder);

        assert_eq!(
            recorder.events,
            vec![Event::Update(Scope::Group(Group::Air))]
        );
    }

    #[test]
    fn standalone_states_have_no_group_callbacks() {
        let mut machine = StateMachine::new("test");
        let mut recorder = Recorder::default();

        machine.set_state(TestState::Menu, &mut recorder);
        recorder.events.clear();
        machine.update(ms(16), &mut recorder);

        assert_eq!(
            recorder.events,
            vec![Event::Update(Scope::Leaf(TestState::Menu))]
        );
        assert_eq!(machine.current_group(), None);
    }
}
