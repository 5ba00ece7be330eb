//! Property tests for permission and dotenv parsing.

use proptest::prelude::*;
use signals_core::config::parse_dotenv_contents;
use signals_core::{Permission, SignalsError};

proptest! {
    #[test]
    fn bare_and_qualified_names_parse_to_the_same_permission(
        index in any::<proptest::sample::Index>(),
        pad in "[ \t]{0,3}",
    ) {
        let permission = Permission::ALL[index.index(Permission::ALL.len())];
        let bare: Permission = format!("{pad}{}{pad}", permission.codename()).parse().unwrap();
        let qualified: Permission = permission.qualified_name().parse().unwrap();
        prop_assert_eq!(bare, permission);
        prop_assert_eq!(qualified, permission);
    }

    #[test]
    fn names_outside_the_catalogue_are_rejected(name in "[a-z_]{1,24}") {
        prop_assume!(Permission::ALL.iter().all(|p| p.codename() != name));
        let err = name.parse::<Permission>().unwrap_err();
        prop_assert!(matches!(err, SignalsError::UnknownPermission(ref raw) if *raw == name));
    }

    #[test]
    fn dotenv_keeps_last_assignment(
        key in "[A-Z][A-Z_]{0,12}",
        first in "[a-z0-9]{1,8}",
        second in "[a-z0-9]{1,8}",
    ) {
        let contents = format!("# comment\n{key}={first}\nexport {key}=\"{second}\"\n");
        let parsed = parse_dotenv_contents(&contents);
        prop_assert_eq!(parsed.get(&key), Some(&second));
    }
}
