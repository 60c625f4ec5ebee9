fn main() {
    // Only the ESP-IDF build needs the sysenv link arguments; host builds
    // (tests, fuzzing) compile the pure-logic library alone.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
