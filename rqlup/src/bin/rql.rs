//! rql launcher — forwards every argument to `python -m rql` in vendor/venv.
//! Arguments are never parsed here; `rql --help` is rql's own help.

fn main() {
    rqlup::run_launcher()
}
