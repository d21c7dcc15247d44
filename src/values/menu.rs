// The two values the menu engine itself is built on.

text_value! {
    /// The code a user types to pick a menu option.
    Key / KeyError {
        len: 1..=10,
        allowed: |c: char| c.is_ascii_alphanumeric() || c == '_' || c == '-',
        help: "Invalid key: it should be between 1 and 10 characters among letters, digits, '_' and '-'",
    }
}

text_value! {
    /// Display text: a menu title or an option label.
    Description / DescriptionError {
        len: 1..=1000,
        allowed: |c: char| c.is_ascii_alphanumeric() || " ;.,_-".contains(c),
        help: "Invalid description: it should be between 1 and 1000 characters among letters, digits, spaces and ';.,_-'",
    }
}
