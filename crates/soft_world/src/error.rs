use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WorldError {
    /// The body handle was destroyed or never belonged to this world
    UnknownBody,
    UnknownJoint,
    /// The joint exists but is not a mouse joint
    NotMouseJoint,
    /// Spring joints need a finite frequency above zero
    InvalidFrequency(f32),
}

impl fmt::Display for WorldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorldError::UnknownBody => write!(f, "body handle does not resolve to a live body"),
            WorldError::UnknownJoint => write!(f, "joint handle does not resolve to a live joint"),
            WorldError::NotMouseJoint => write!(f, "joint is not a mouse joint"),
            WorldError::InvalidFrequency(frequency) => {
                write!(f, "invalid joint frequency {frequency}, expected a finite value above zero")
            }
        }
    }
}

impl std::error::Error for WorldError {}
