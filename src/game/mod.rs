// Game modules: the player character and its combat rules

pub mod characters;
pub mod combat;
