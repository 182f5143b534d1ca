//! Room visibility rules.

use alumni_database::{ChatRoom, RoomType, User};

use crate::types::{ChatError, ChatResult};

/// General rooms are open to every verified member; scoped rooms only to members
/// of the matching cohort or program track.
pub struct RoomAccess;

impl RoomAccess {
    pub fn can_view(room: &ChatRoom, user: &User) -> bool {
        let scope = room.scope_value.as_deref();
        match room.room_type {
            RoomType::General => true,
            RoomType::Cohort => scope.is_some() && user.cohort.as_deref() == scope,
            RoomType::ProgramTrack => scope.is_some() && user.program_track.as_deref() == scope,
        }
    }

    pub fn ensure_verified(user: &User) -> ChatResult<()> {
        if user.is_verified_alumni {
            Ok(())
        } else {
            Err(ChatError::unverified())
        }
    }

    pub fn ensure_can_view(room: &ChatRoom, user: &User) -> ChatResult<()> {
        if Self::can_view(room, user) {
            Ok(())
        } else {
            Err(ChatError::access_denied(format!(
                "You do not have access to {}",
                room.name
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alumni_database::{MemberPaymentStatus, MembershipTier};
    use chrono::Utc;

    fn member(cohort: Option<&str>, track: Option<&str>) -> User {
        User {
            id: "u1".into(),
            name: "Ada".into(),
            email: "ada@alumni.test".into(),
            membership_tier: MembershipTier::Free,
            payment_status: MemberPaymentStatus::Active,
            bio: None,
            birthday: None,
            cohort: cohort.map(str::to_string),
            program_track: track.map(str::to_string),
            interests: vec![],
            profile_photo_url: None,
            is_verified_alumni: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn room(room_type: RoomType, scope: Option<&str>) -> ChatRoom {
        ChatRoom {
            id: "r1".into(),
            name: "Room".into(),
            description: None,
            room_type,
            scope_value: scope.map(str::to_string),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn scoped_rooms_match_the_member() {
        let ada = member(Some("2019"), Some("Engineering"));
        assert!(RoomAccess::can_view(&room(RoomType::General, None), &ada));
        assert!(RoomAccess::can_view(&room(RoomType::Cohort, Some("2019")), &ada));
        assert!(!RoomAccess::can_view(&room(RoomType::Cohort, Some("2020")), &ada));
        assert!(RoomAccess::can_view(&room(RoomType::ProgramTrack, Some("Engineering")), &ada));
        assert!(!RoomAccess::can_view(&room(RoomType::ProgramTrack, Some("Design")), &ada));
    }

    #[test]
    fn members_without_a_cohort_see_no_cohort_rooms() {
        let drifter = member(None, None);
        assert!(!RoomAccess::can_view(&room(RoomType::Cohort, None), &drifter));
    }

    #[test]
    fn unverified_members_are_refused() {
        let mut guest = member(None, None);
        guest.is_verified_alumni = false;
        let err = RoomAccess::ensure_verified(&guest).unwrap_err();
        assert_eq!(err.to_string(), "Access denied. Verified alumni only.");
    }
}
