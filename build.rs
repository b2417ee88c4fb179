fn main() {
    println!("cargo:rerun-if-env-changed=ARWE_CONFIG_JSON");

    // Only the firmware build needs the ESP-IDF environment; host test
    // builds run with `--no-default-features`.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
