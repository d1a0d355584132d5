// Engine modules: frame timing and input

pub mod game_loop;
pub mod input;
