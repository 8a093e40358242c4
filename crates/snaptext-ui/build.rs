fn main() {
    slint_build::compile("ui/snaptext.slint").unwrap();
}
