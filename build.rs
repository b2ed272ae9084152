fn main() {
    // Only the espidf build needs the ESP-IDF sysenv propagated to the
    // linker; host builds of the library and tests skip it.
    if std::env::var_os("CARGO_FEATURE_ESPIDF").is_some() {
        embuild::espidf::sysenv::output();
    }
}
