//! The rule deciding who may touch a CV and its sections. Services apply it
//! before validating, repositories apply it again inside the write
//! transaction.

use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AccessError {
    #[error("CV not found")]
    CvNotFound,

    #[error("Section not found")]
    SectionNotFound,

    #[error("You do not have permission to modify this CV")]
    Forbidden,
}

/// Target CV of a create, or the destination of a move.
pub fn authorize_cv(caller: Uuid, cv_owner: Option<Uuid>) -> Result<(), AccessError> {
    match cv_owner {
        None => Err(AccessError::CvNotFound),
        Some(owner) if owner != caller => Err(AccessError::Forbidden),
        Some(_) => Ok(()),
    }
}

/// Existing section being changed or deleted; `section_owner` is the owner
/// of its current CV.
pub fn authorize_section(caller: Uuid, section_owner: Option<Uuid>) -> Result<(), AccessError> {
    match section_owner {
        None => Err(AccessError::SectionNotFound),
        Some(owner) if owner != caller => Err(AccessError::Forbidden),
        Some(_) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_passes() {
        let me = Uuid::new_v4();
        assert_eq!(authorize_cv(me, Some(me)), Ok(()));
        assert_eq!(authorize_section(me, Some(me)), Ok(()));
    }

    #[test]
    fn stranger_is_forbidden() {
        let me = Uuid::new_v4();
        let other = Some(Uuid::new_v4());
        assert_eq!(authorize_cv(me, other), Err(AccessError::Forbidden));
        assert_eq!(authorize_section(me, other), Err(AccessError::Forbidden));
    }

    #[test]
    fn missing_rows_are_not_found() {
        let me = Uuid::new_v4();
        assert_eq!(authorize_cv(me, None), Err(AccessError::CvNotFound));
        assert_eq!(authorize_section(me, None), Err(AccessError::SectionNotFound));
    }
}
