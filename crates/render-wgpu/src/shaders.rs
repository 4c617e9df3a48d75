//! WGSL sources. Both pipelines share one uniform block and the fog ramp.

/// Uniform block and distance fog, prepended to every shader.
const PRELUDE: &str = r#"
struct Frame {
    view_proj: mat4x4<f32>,
    eye: vec4<f32>,
    fog_color: vec4<f32>,
    // x = start, y = end
    fog_range: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> frame: Frame;

fn apply_fog(color: vec3<f32>, world_pos: vec3<f32>) -> vec3<f32> {
    let span = max(frame.fog_range.y - frame.fog_range.x, 0.0001);
    let t = clamp((distance(world_pos, frame.eye.xyz) - frame.fog_range.x) / span, 0.0, 1.0);
    return mix(color, frame.fog_color.rgb, t);
}
"#;

/// Instanced boxes (targets and floor slab) under a hemisphere light.
const BOX_BODY: &str = r#"
struct BoxVertex {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

struct BoxInstance {
    @location(2) col0: vec4<f32>,
    @location(3) col1: vec4<f32>,
    @location(4) col2: vec4<f32>,
    @location(5) col3: vec4<f32>,
    @location(6) tint: vec4<f32>,
};

struct Varyings {
    @builtin(position) clip: vec4<f32>,
    @location(0) normal: vec3<f32>,
    @location(1) tint: vec4<f32>,
    @location(2) world_pos: vec3<f32>,
};

@vertex
fn vs_main(v: BoxVertex, i: BoxInstance) -> Varyings {
    let model = mat4x4<f32>(i.col0, i.col1, i.col2, i.col3);
    let world = model * vec4<f32>(v.position, 1.0);

    var out: Varyings;
    out.clip = frame.view_proj * world;
    // Boxes are axis aligned, so the normal survives scaling unchanged.
    out.normal = v.normal;
    out.tint = i.tint;
    out.world_pos = world.xyz;
    return out;
}

@fragment
fn fs_main(in: Varyings) -> @location(0) vec4<f32> {
    let sky_light = vec3<f32>(0.933, 0.933, 1.0);
    let ground_light = vec3<f32>(0.467, 0.467, 0.533);
    let light = mix(ground_light, sky_light, in.normal.y * 0.5 + 0.5);
    return vec4<f32>(apply_fog(in.tint.rgb * light, in.world_pos), in.tint.a);
}
"#;

/// Unlit floor grid lines.
const GRID_BODY: &str = r#"
struct LineVertex {
    @location(0) position: vec3<f32>,
    @location(1) color: vec4<f32>,
};

struct LineVaryings {
    @builtin(position) clip: vec4<f32>,
    @location(0) color: vec4<f32>,
    @location(1) world_pos: vec3<f32>,
};

@vertex
fn vs_grid(v: LineVertex) -> LineVaryings {
    var out: LineVaryings;
    out.clip = frame.view_proj * vec4<f32>(v.position, 1.0);
    out.color = v.color;
    out.world_pos = v.position;
    return out;
}

@fragment
fn fs_grid(in: LineVaryings) -> @location(0) vec4<f32> {
    return vec4<f32>(apply_fog(in.color.rgb, in.world_pos), in.color.a);
}
"#;

pub fn box_shader() -> String {
    format!("{PRELUDE}{BOX_BODY}")
}

pub fn grid_shader() -> String {
    format!("{PRELUDE}{GRID_BODY}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_points_present() {
        let boxes = box_shader();
        assert!(boxes.contains("fn vs_main") && boxes.contains("fn fs_main"));
        let grid = grid_shader();
        assert!(grid.contains("fn vs_grid") && grid.contains("fn fs_grid"));
        assert_eq!(grid.matches("var<uniform> frame").count(), 1);
    }
}
