use shadow_rs::ShadowBuilder;

fn main() {
    // Embed git/build metadata for `contacts-rs --version`
    ShadowBuilder::builder()
        .build()
        .expect("Failed to generate build metadata");
}
