//! Person entities for creators.

use serde_json::Value;

use cratemaker_shared::{Creator, ORCID_RESOLVER};

use crate::rocrate::{Entity, RoCrate};

/// Canonical `@id` for a creator.
///
/// 1. an ORCID that is already a URL is used as is
/// 2. a bare ORCID is resolved against `https://orcid.org/`
/// 3. without an ORCID, a local `#Family_Given` fragment is derived from the
///    name: `", "` becomes `"_"`, as does any remaining whitespace
///
/// An empty name with no ORCID gives `"#"`.
pub fn creator_id(name: &str, orcid: Option<&str>) -> String {
    match orcid {
        Some(orcid) if orcid.starts_with("http") => orcid.to_string(),
        Some(orcid) => format!("{ORCID_RESOLVER}{orcid}"),
        None => {
            let fragment: String = name
                .replace(", ", "_")
                .chars()
                .map(|c| if c.is_whitespace() { '_' } else { c })
                .collect();
            format!("#{fragment}")
        }
    }
}

/// A `Person` entity for one creator.
pub fn person(creator: &Creator) -> Entity {
    let mut entity = Entity::new(creator_id(&creator.name, creator.orcid()), "Person");
    entity.set("name", creator.name.as_str());
    entity
}

/// Add one `Person` per creator to `crate_`, preserving order, and return the
/// references to them.
pub fn create_people(crate_: &mut RoCrate, creators: &[Creator]) -> Vec<Value> {
    crate_.add_all(creators.iter().map(person))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn bare_orcid_is_resolved() {
        assert_eq!(
            creator_id("Doe, Jane", Some("0000-0002-1825-0097")),
            "https://orcid.org/0000-0002-1825-0097"
        );
    }

    #[test]
    fn url_orcid_is_kept() {
        let orcid = "https://orcid.org/0000-0002-1825-0097";
        assert_eq!(creator_id("Doe, Jane", Some(orcid)), orcid);
        assert_eq!(creator_id("x", Some("http://example.org/me")), "http://example.org/me");
    }

    #[test]
    fn missing_orcid_uses_name_fragment() {
        assert_eq!(creator_id("Doe, Jane", None), "#Doe_Jane");
        assert_eq!(creator_id("A B", None), "#A_B");
        assert_eq!(creator_id("van Rossum, Guido", None), "#van_Rossum_Guido");
    }

    #[test]
    fn empty_creator_gives_bare_fragment() {
        assert_eq!(creator_id("", None), "#");
    }

    #[test]
    fn derivation_is_deterministic() {
        let creator = Creator::new("Doe, Jane", "");
        assert_eq!(person(&creator), person(&creator));
    }

    #[test]
    fn create_people_preserves_order_and_registers() {
        let mut crate_ = RoCrate::new();
        let creators = vec![
            Creator::new("Doe, Jane", ""),
            Creator::new("Smith, John", "0000-0002-1825-0097"),
        ];

        let refs = create_people(&mut crate_, &creators);
        assert_eq!(
            refs,
            vec![
                json!({"@id": "#Doe_Jane"}),
                json!({"@id": "https://orcid.org/0000-0002-1825-0097"}),
            ]
        );

        let people = crate_.entities();
        assert_eq!(people.len(), 2);
        assert_eq!(people[1].kind(), "Person");
        assert_eq!(people[1].get("name").unwrap(), "Smith, John");
    }
}
