//! GPU point renderer for large particle counts.
//!
//! Vertex buffers are allocated once for the effect's fixed capacity; every
//! frame overwrites them in place with `bufferSubData`. Lightning is not drawn
//! here, effects with bolts always get the canvas renderer.

use js_sys::Float32Array;
use log::warn;
use wasm_bindgen::JsCast;
use web_sys::{
	Document, HtmlCanvasElement, WebGl2RenderingContext as Gl, WebGlBuffer, WebGlProgram,
	WebGlShader, WebGlUniformLocation,
};

use super::display::PointBuffer;
use super::render::{Renderer, Scene};

const VERTEX_SHADER: &str = r#"#version 300 es
in vec2 a_position;
in float a_size;
in vec4 a_color;
uniform vec2 u_resolution;
uniform float u_pixel_ratio;
out vec4 v_color;
void main() {
	vec2 clip = (a_position / u_resolution) * 2.0 - 1.0;
	gl_Position = vec4(clip.x, -clip.y, 0.0, 1.0);
	gl_PointSize = max(a_size * 2.0 * u_pixel_ratio, 1.0);
	v_color = a_color;
}
"#;

const FRAGMENT_SHADER: &str = r#"#version 300 es
precision mediump float;
in vec4 v_color;
out vec4 out_color;
void main() {
	float d = length(gl_PointCoord - vec2(0.5));
	if (d > 0.5) {
		discard;
	}
	float falloff = 1.0 - smoothstep(0.15, 0.5, d);
	out_color = vec4(v_color.rgb, v_color.a * falloff);
}
"#;

/// One float attribute backed by its own buffer and staging array.
struct Attribute {
	location: u32,
	components: i32,
	buffer: WebGlBuffer,
	staging: Float32Array,
}

impl Attribute {
	fn new(gl: &Gl, program: &WebGlProgram, name: &str, components: i32, capacity: usize) -> Option<Self> {
		let location = u32::try_from(gl.get_attrib_location(program, name)).ok()?;
		let buffer = gl.create_buffer()?;
		let len = capacity * components as usize;

		gl.bind_buffer(Gl::ARRAY_BUFFER, Some(&buffer));
		gl.buffer_data_with_i32(Gl::ARRAY_BUFFER, (len * 4) as i32, Gl::DYNAMIC_DRAW);
		gl.enable_vertex_attrib_array(location);
		gl.vertex_attrib_pointer_with_i32(location, components, Gl::FLOAT, false, 0, 0);

		Some(Self {
			location,
			components,
			buffer,
			staging: Float32Array::new_with_length(len as u32),
		})
	}

	/// Uploads `data`, which must cover the full capacity.
	fn upload(&self, gl: &Gl, data: &[f32]) {
		self.staging.copy_from(data);
		gl.bind_buffer(Gl::ARRAY_BUFFER, Some(&self.buffer));
		gl.buffer_sub_data_with_i32_and_array_buffer_view(Gl::ARRAY_BUFFER, 0, &self.staging);
		gl.vertex_attrib_pointer_with_i32(self.location, self.components, Gl::FLOAT, false, 0, 0);
	}
}

pub struct WebGlRenderer {
	gl: Gl,
	program: WebGlProgram,
	resolution: Option<WebGlUniformLocation>,
	pixel_ratio: Option<WebGlUniformLocation>,
	positions: Attribute,
	sizes: Attribute,
	colors: Attribute,
	points: PointBuffer,
	width: f64,
	height: f64,
}

fn context(canvas: &HtmlCanvasElement) -> Option<Gl> {
	canvas.get_context("webgl2").ok().flatten()?.dyn_into::<Gl>().ok()
}

fn build_program(gl: &Gl) -> Option<WebGlProgram> {
	let vertex = compile(gl, Gl::VERTEX_SHADER, VERTEX_SHADER)?;
	let fragment = compile(gl, Gl::FRAGMENT_SHADER, FRAGMENT_SHADER)?;
	link(gl, &vertex, &fragment)
}

/// Whether this browser can run the point shaders. Checked on a detached
/// canvas: a canvas that has handed out a `webgl2` context can never give a
/// `2d` one, so the page canvas is only touched once WebGL is known to work.
pub fn supported(document: &Document) -> bool {
	let Some(canvas) = document
		.create_element("canvas")
		.ok()
		.and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
	else {
		return false;
	};
	let Some(gl) = context(&canvas) else {
		return false;
	};
	match build_program(&gl) {
		Some(program) => {
			gl.delete_program(Some(&program));
			true
		}
		None => false,
	}
}

impl WebGlRenderer {
	/// `None` when WebGL2 is unavailable or the shaders fail to build. Once
	/// this has run, `canvas` is bound to WebGL; call [`supported`] first.
	pub fn new(canvas: &HtmlCanvasElement, capacity: usize, width: f64, height: f64) -> Option<Self> {
		let gl = context(canvas)?;
		let program = build_program(&gl)?;
		gl.use_program(Some(&program));

		let capacity = capacity.max(1);
		let positions = Attribute::new(&gl, &program, "a_position", 2, capacity)?;
		let sizes = Attribute::new(&gl, &program, "a_size", 1, capacity)?;
		let colors = Attribute::new(&gl, &program, "a_color", 4, capacity)?;

		gl.enable(Gl::BLEND);
		gl.blend_func(Gl::SRC_ALPHA, Gl::ONE);

		let mut renderer = Self {
			resolution: gl.get_uniform_location(&program, "u_resolution"),
			pixel_ratio: gl.get_uniform_location(&program, "u_pixel_ratio"),
			gl,
			program,
			positions,
			sizes,
			colors,
			points: PointBuffer::with_capacity(capacity),
			width,
			height,
		};
		renderer.resize(width, height);
		Some(renderer)
	}
}

impl Renderer for WebGlRenderer {
	fn resize(&mut self, width: f64, height: f64) {
		self.width = width.max(1.0);
		self.height = height.max(1.0);
		self.gl.use_program(Some(&self.program));
		self.gl.viewport(0, 0, self.width as i32, self.height as i32);
		self.gl
			.uniform2f(self.resolution.as_ref(), self.width as f32, self.height as f32);
		self.gl.uniform1f(self.pixel_ratio.as_ref(), 1.0);
	}

	fn draw(&mut self, scene: &Scene<'_>) {
		let gl = &self.gl;
		let [r, g, b, a] = scene
			.config
			.style
			.background
			.map(|c| c.to_unit())
			.unwrap_or([0.0; 4]);
		gl.clear_color(r, g, b, a);
		gl.clear(Gl::COLOR_BUFFER_BIT);

		let count = self.points.fill(
			scene.particles,
			&scene.projection,
			&scene.config.style,
			scene.config.intensity,
			scene.time,
		);
		if count == 0 {
			return;
		}

		gl.use_program(Some(&self.program));
		self.positions.upload(gl, self.points.positions());
		self.sizes.upload(gl, self.points.sizes());
		self.colors.upload(gl, self.points.colors());
		gl.draw_arrays(Gl::POINTS, 0, count as i32);
	}
}

fn compile(gl: &Gl, kind: u32, source: &str) -> Option<WebGlShader> {
	let shader = gl.create_shader(kind)?;
	gl.shader_source(&shader, source);
	gl.compile_shader(&shader);
	let ok = gl
		.get_shader_parameter(&shader, Gl::COMPILE_STATUS)
		.as_bool()
		.unwrap_or(false);
	if ok {
		Some(shader)
	} else {
		warn!(
			"journal-backdrop: shader failed to compile: {}",
			gl.get_shader_info_log(&shader).unwrap_or_default()
		);
		gl.delete_shader(Some(&shader));
		None
	}
}

fn link(gl: &Gl, vertex: &WebGlShader, fragment: &WebGlShader) -> Option<WebGlProgram> {
	let program = gl.create_program()?;
	gl.attach_shader(&program, vertex);
	gl.attach_shader(&program, fragment);
	gl.link_program(&program);
	let ok = gl
		.get_program_parameter(&program, Gl::LINK_STATUS)
		.as_bool()
		.unwrap_or(false);
	if ok {
		Some(program)
	} else {
		warn!(
			"journal-backdrop: shader program failed to link: {}",
			gl.get_program_info_log(&program).unwrap_or_default()
		);
		gl.delete_program(Some(&program));
		None
	}
}
