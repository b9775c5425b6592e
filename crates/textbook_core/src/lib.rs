pub mod domain;
pub mod ports;

pub use domain::{
    AuthProvider, Credentials, LearningMaterial, MaterialType, SearchResult, Session, User,
};
pub use ports::{
    LearningMaterialsService, PortError, PortResult, RetrievalService, SessionStorage,
};
