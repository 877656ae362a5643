pub mod health;
pub mod shared;
pub mod squads;
