use crate::log::targets::GAME as LOG_GAME;
use crate::{Board, Cell, KnowledgeBase};
use rand::Rng;

/// Represents the current state of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Playing,
    Won,
    Lost,
}

/// How the player arrived at a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKind {
    /// Proven safe by inference.
    Deduced,
    /// Nothing was certain, so a random unprobed cell was picked.
    Guessed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Revealed(usize),
    Detonated,
}

/// One probe and what the board said about it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Turn {
    pub cell: Cell,
    pub kind: MoveKind,
    pub outcome: Outcome,
}

/// A board and the player working on it.
pub struct Game {
    board: Board,
    player: KnowledgeBase,
    state: GameState,
    turns: usize,
}

impl Game {
    pub fn new(board: Board) -> Self {
        let player = KnowledgeBase::new(board.height(), board.width());
        log::info!(
            target: LOG_GAME,
            "New {}x{} game with {} mines",
            board.height(),
            board.width(),
            board.mines().len()
        );
        Game {
            board,
            player,
            state: GameState::Playing,
            turns: 0,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn player(&self) -> &KnowledgeBase {
        &self.player
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn turns(&self) -> usize {
        self.turns
    }

    /// Makes one move: a deduced safe cell if there is one, otherwise a guess.
    ///
    /// Returns `None` when the player has no move left, which ends the game.
    pub fn play_turn<R: Rng + ?Sized>(&mut self, rng: &mut R) -> anyhow::Result<Option<Turn>> {
        if self.state != GameState::Playing {
            anyhow::bail!("game_ended");
        }

        let (cell, kind) = match self.player.make_safe_move() {
            Some(cell) => (cell, MoveKind::Deduced),
            None => match self.player.make_random_move(rng) {
                Some(cell) => (cell, MoveKind::Guessed),
                None => {
                    anyhow::ensure!(self.board.won(), "no move left on an uncleared board");
                    self.state = GameState::Won;
                    return Ok(None);
                }
            },
        };

        self.turns += 1;
        let outcome = match self.board.reveal(cell) {
            None => {
                log::info!(target: LOG_GAME, "Turn {}: {cell} was a mine", self.turns);
                self.state = GameState::Lost;
                Outcome::Detonated
            }
            Some(count) => {
                self.player.add_knowledge(cell, count)?;
                for &mine in self.player.mines() {
                    self.board.flag(mine);
                }
                if self.board.won() {
                    log::info!(target: LOG_GAME, "Won after {} turns", self.turns);
                    self.state = GameState::Won;
                }
                Outcome::Revealed(count)
            }
        };

        Ok(Some(Turn {
            cell,
            kind,
            outcome,
        }))
    }

    /// Plays until the game is won or lost.
    pub fn play_out<R: Rng + ?Sized>(&mut self, rng: &mut R) -> anyhow::Result<GameState> {
        while self.state == GameState::Playing {
            self.play_turn(rng)?;
        }
        Ok(self.state)
    }
}
