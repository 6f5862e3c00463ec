#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    const fn index(self) -> usize {
        match self {
            Direction::Up => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Right => 3,
        }
    }
}

const DIRECTION_COUNT: usize = 4;

/// Anything that can answer "is this direction currently held".
pub trait InputSource {
    fn is_action_active(&self, direction: Direction) -> bool;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct ActionStates {
    down: [bool; DIRECTION_COUNT],
}

impl ActionStates {
    pub(crate) fn set(&mut self, direction: Direction, is_down: bool) {
        self.down[direction.index()] = is_down;
    }

    pub(crate) fn is_down(&self, direction: Direction) -> bool {
        self.down[direction.index()]
    }
}

/// Held-key state sampled once per simulation step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    actions: ActionStates,
    quit_requested: bool,
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn new(actions: ActionStates, quit_requested: bool) -> Self {
        Self {
            actions,
            quit_requested,
        }
    }

    pub fn from_directions(directions: &[Direction]) -> Self {
        directions
            .iter()
            .fold(Self::empty(), |snapshot, direction| {
                snapshot.with_direction(*direction, true)
            })
    }

    pub fn with_direction(mut self, direction: Direction, is_down: bool) -> Self {
        self.actions.set(direction, is_down);
        self
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }
}

impl InputSource for InputSnapshot {
    fn is_action_active(&self, direction: Direction) -> bool {
        self.actions.is_down(direction)
    }
}
