//! Provisions users for cabinet-web.
//!
//! Reads a password from stdin and prints its argon2 hash. Given a
//! username, prints a ready-to-paste `[[users]]` entry for the server
//! config instead.

use std::io::{self, Write};

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2,
};

fn render_user_entry(username: &str, hash: &str) -> String {
    format!("[[users]]\nusername = \"{username}\"\npassword_hash = \"{hash}\"\n")
}

fn main() {
    let username = std::env::args().nth(1);
    if matches!(username.as_deref(), Some("--help" | "-h")) {
        eprintln!("Usage: hash_password [USERNAME]");
        eprintln!();
        eprintln!("Reads a password from stdin and prints an argon2 hash.");
        eprintln!("With USERNAME, prints a [[users]] entry for the cabinet-web config.");
        return;
    }

    eprint!("Password for new cabinet user: ");
    io::stderr().flush().unwrap();

    let mut password = String::new();
    io::stdin().read_line(&mut password).unwrap();
    let password = password.trim();

    if password.is_empty() {
        eprintln!("Password must not be empty");
        std::process::exit(1);
    }

    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .expect("argon2 hashing failed")
        .to_string();

    match username {
        Some(username) => print!("{}", render_user_entry(&username, &hash)),
        None => println!("{hash}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_entry_matches_the_config_shape() {
        let entry = render_user_entry("alice", "$argon2id$stub");

        assert!(entry.starts_with("[[users]]\n"));
        assert!(entry.contains("username = \"alice\""));
        assert!(entry.contains("password_hash = \"$argon2id$stub\""));
    }
}
