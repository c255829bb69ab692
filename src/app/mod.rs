// Application layer - Use case interactors

pub mod container;
pub mod cut_interactor;

pub use container::{AppContainer, DefaultAppContainer};
pub use cut_interactor::{CutHandle, CutSettings, VideoCutInteractor};
