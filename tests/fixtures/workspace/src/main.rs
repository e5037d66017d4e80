fn main() {
    println!("walksnail-osd-tool fixture");
}
