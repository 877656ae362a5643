pub mod squad;

pub use squad::SquadRepository;
