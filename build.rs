fn main() {
    println!("cargo:rerun-if-changed=components/node_shim/node_shim.cpp");
    println!("cargo:rerun-if-changed=components/node_shim/include/node_shim.h");

    // The shim component is compiled by the ESP-IDF CMake build; host builds
    // only need the Rust library, so there is nothing to forward.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
