//! Content digest of a full table listing.
//!
//! Used by feeds that cannot receive push notifications: two listings with
//! the same digest are treated as "nothing changed". The digest covers ids,
//! the four text fields and both timestamps, in listing order.

use sha1::{Digest, Sha1};

use crate::models::{Employee, EmployeeField};

/// SHA-1 over a listing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SnapshotDigest(pub [u8; 20]);

impl SnapshotDigest {
    pub fn of(records: &[Employee]) -> Self {
        let mut hasher = Sha1::new();
        for record in records {
            hasher.update(record.id.as_str().as_bytes());
            hasher.update([0u8]);
            for field in [
                EmployeeField::Name,
                EmployeeField::Email,
                EmployeeField::EmpNum,
                EmployeeField::PhoneNo,
                EmployeeField::CreatedAt,
                EmployeeField::UpdatedAt,
            ] {
                hasher.update(record.text(field).as_bytes());
                hasher.update([0u8]);
            }
            hasher.update([b'\n']);
        }
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&hasher.finalize());
        SnapshotDigest(bytes)
    }

    /// Return the hex string representation.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl std::fmt::Display for SnapshotDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EmployeeId;

    fn employee(id: &str, name: &str) -> Employee {
        Employee {
            id: EmployeeId::new(id),
            name: name.to_string(),
            email: "x@example.com".into(),
            emp_num: "E1".into(),
            phone_no: "1".into(),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_empty_listing_is_sha1_of_nothing() {
        assert_eq!(
            SnapshotDigest::of(&[]).to_hex(),
            "da39a3ee5e6b4b0d3255bfef95601890afd80709"
        );
    }

    #[test]
    fn test_digest_tracks_field_changes() {
        let before = vec![employee("1", "Alice"), employee("2", "Bob")];
        let mut after = before.clone();
        assert_eq!(SnapshotDigest::of(&before), SnapshotDigest::of(&after));

        after[1].name = "Robert".into();
        assert_ne!(SnapshotDigest::of(&before), SnapshotDigest::of(&after));
    }

    #[test]
    fn test_digest_field_boundaries() {
        // "ab" + "c" must not collide with "a" + "bc"
        let mut a = employee("1", "ab");
        a.email = "c".into();
        let mut b = employee("1", "a");
        b.email = "bc".into();
        assert_ne!(SnapshotDigest::of(&[a]), SnapshotDigest::of(&[b]));
    }
}
