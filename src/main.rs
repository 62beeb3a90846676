use billdash_frontend::app::App;

fn main() {
    yew::Renderer::<App>::new().render();
}
