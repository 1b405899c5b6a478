pub mod targets {
    pub const KNOWLEDGE: &str = "knowledge";
    pub const INFERENCE: &str = "inference";
    pub const MOVES: &str = "moves";
    pub const GAME: &str = "game";
}
