use crate::model::types::{BondOrder, Element};

/// Resolves a ctfile element column, tolerating case slips such as `CL`.
pub fn guess_element_symbol(token: &str) -> Option<Element> {
    let token = token.trim();
    if let Ok(e) = token.parse::<Element>() {
        return Some(e);
    }
    if matches!(token, "R" | "A" | "Q" | "R#") {
        return Some(Element::Dummy);
    }
    let mut chars = token.chars();
    let first = chars.next()?.to_ascii_uppercase();
    let rest: String = chars.map(|c| c.to_ascii_lowercase()).collect();
    format!("{first}{rest}").parse().ok()
}

pub fn bond_order_from_ctfile(value: i32) -> Option<BondOrder> {
    match value {
        1 => Some(BondOrder::Single),
        2 => Some(BondOrder::Double),
        3 => Some(BondOrder::Triple),
        4 => Some(BondOrder::Aromatic),
        _ => None,
    }
}

pub fn bond_order_to_ctfile(order: BondOrder) -> i32 {
    match order {
        BondOrder::Single => 1,
        BondOrder::Double => 2,
        BondOrder::Triple => 3,
        BondOrder::Aromatic => 4,
    }
}

/// Decodes the legacy atom-block charge code (`3` is +1, `5` is -1, ...).
pub fn charge_from_ctfile_code(code: i32) -> Option<i8> {
    match code {
        0 => Some(0),
        1 => Some(3),
        2 => Some(2),
        3 => Some(1),
        5 => Some(-1),
        6 => Some(-2),
        7 => Some(-3),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_guess_handles_case_and_query_atoms() {
        assert_eq!(guess_element_symbol("CL"), Some(Element::Cl));
        assert_eq!(guess_element_symbol(" n "), Some(Element::N));
        assert_eq!(guess_element_symbol("R"), Some(Element::Dummy));
        assert_eq!(guess_element_symbol("Xx"), None);
    }

    #[test]
    fn ctfile_bond_orders() {
        for order in [
            BondOrder::Single,
            BondOrder::Double,
            BondOrder::Triple,
            BondOrder::Aromatic,
        ] {
            assert_eq!(bond_order_from_ctfile(bond_order_to_ctfile(order)), Some(order));
        }
        assert_eq!(bond_order_from_ctfile(8), None);
    }

    #[test]
    fn legacy_charge_codes() {
        assert_eq!(charge_from_ctfile_code(3), Some(1));
        assert_eq!(charge_from_ctfile_code(5), Some(-1));
        assert_eq!(charge_from_ctfile_code(4), None);
    }
}
