use shared::{Club, Membership, MembershipStatus};

use crate::store::{MembershipFilter, MembershipStore};

/// Clubs the user can still request to join: everything minus clubs
/// where they hold a pending or approved membership. Terminal history
/// (rejected, left) does not block re-application.
pub fn available_clubs(store: &MembershipStore, clubs: &[Club], user_id: i64) -> Vec<Club> {
    clubs
        .iter()
        .filter(|club| store.active_for(user_id, club.id).is_none())
        .cloned()
        .collect()
}

/// The leader console's triage queue: pending requests for one club,
/// optionally narrowed by a text match on member name/email.
pub fn pending_queue(
    store: &MembershipStore,
    club_id: i64,
    text: Option<&str>,
) -> Vec<Membership> {
    store.list(&MembershipFilter {
        status: Some(MembershipStatus::Pending),
        club_id: Some(club_id),
        text: text.map(str::to_string),
    })
}

/// A club's active roster is exactly its approved memberships.
pub fn active_roster(store: &MembershipStore, club_id: i64) -> Vec<Membership> {
    store.list(&MembershipFilter {
        status: Some(MembershipStatus::Approved),
        club_id: Some(club_id),
        text: None,
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::store::test::membership;
    use crate::store::Scope;

    fn club(id: i64, name: &str) -> Club {
        Club {
            id,
            name: name.to_string(),
            category: "academic".to_string(),
            description: String::new(),
            meeting_schedule: None,
            location: None,
            logo_url: None,
            member_count: 0,
        }
    }

    #[test]
    fn active_membership_hides_club_from_available() {
        let mut store = MembershipStore::new(Scope::User(2));
        store.upsert(membership(1, 2, 7, MembershipStatus::Pending));
        store.upsert(membership(2, 2, 8, MembershipStatus::Rejected));

        let clubs = [club(7, "Chess"), club(8, "Robotics"), club(9, "Choir")];
        let available = available_clubs(&store, &clubs, 2);
        let ids: Vec<i64> = available.iter().map(|c| c.id).collect();
        // Pending hides club 7; the rejection on club 8 does not.
        assert_eq!(ids, vec![8, 9]);
    }

    #[test]
    fn rejection_restores_availability() {
        let mut store = MembershipStore::new(Scope::User(2));
        store.upsert(membership(1, 2, 7, MembershipStatus::Pending));
        let clubs = [club(7, "Chess")];
        assert!(available_clubs(&store, &clubs, 2).is_empty());

        store.upsert(membership(1, 2, 7, MembershipStatus::Rejected));
        assert_eq!(available_clubs(&store, &clubs, 2).len(), 1);
    }

    #[test]
    fn queue_and_roster_split_by_status() {
        let mut store = MembershipStore::new(Scope::Club(7));
        store.upsert(membership(1, 2, 7, MembershipStatus::Pending));
        store.upsert(membership(2, 3, 7, MembershipStatus::Approved));
        store.upsert(membership(3, 4, 7, MembershipStatus::Rejected));

        let queue = pending_queue(&store, 7, None);
        assert_eq!(queue.len(), 1);
        assert_eq!(queue[0].id, 1);

        let roster = active_roster(&store, 7);
        assert_eq!(roster.len(), 1);
        assert_eq!(roster[0].id, 2);
    }

    #[test]
    fn queue_text_filter_matches_name_or_email() {
        let mut store = MembershipStore::new(Scope::Club(7));
        let mut a = membership(1, 2, 7, MembershipStatus::Pending);
        a.member_name = Some("Ada Lovelace".to_string());
        let mut b = membership(2, 3, 7, MembershipStatus::Pending);
        b.member_email = Some("grace@university.edu".to_string());
        store.upsert(a);
        store.upsert(b);

        assert_eq!(pending_queue(&store, 7, Some("lovelace")).len(), 1);
        assert_eq!(pending_queue(&store, 7, Some("GRACE")).len(), 1);
        assert_eq!(pending_queue(&store, 7, Some("zzz")).len(), 0);
    }
}
