/// Shared uniform block and environment bindings; prepended to both shaders.
const COMMON: &str = r#"
struct Frame {
    view_proj: mat4x4<f32>,
    inv_view_proj: mat4x4<f32>,
    model: mat4x4<f32>,
    eye: vec4<f32>,
    // rgb base color, a unused
    base_color: vec4<f32>,
    // metalness, roughness, env_intensity, thickness
    material: vec4<f32>,
    // rgb page color, a opacity
    page: vec4<f32>,
    // rgb ambient color, a ambient intensity
    ambient: vec4<f32>,
    // rgb fallback background, a 1.0 when an environment map is bound
    background: vec4<f32>,
    // xyz position, w intensity
    light_pos: array<vec4<f32>, 4>,
    // rgb color, a 1.0 when the slot is in use
    light_color: array<vec4<f32>, 4>,
};

@group(0) @binding(0)
var<uniform> frame: Frame;
@group(0) @binding(1)
var env_tex: texture_2d<f32>;
@group(0) @binding(2)
var env_sampler: sampler;

const PI: f32 = 3.14159265;

fn equirect_uv(dir: vec3<f32>) -> vec2<f32> {
    let d = normalize(dir);
    let u = atan2(d.z, d.x) / (2.0 * PI) + 0.5;
    let v = acos(clamp(d.y, -1.0, 1.0)) / PI;
    return vec2<f32>(u, v);
}

fn sample_env(dir: vec3<f32>) -> vec3<f32> {
    if frame.background.a < 0.5 {
        return frame.background.rgb;
    }
    return textureSampleLevel(env_tex, env_sampler, equirect_uv(dir), 0.0).rgb;
}

fn fade(color: vec3<f32>) -> vec4<f32> {
    return vec4<f32>(mix(frame.page.rgb, color, frame.page.a), 1.0);
}
"#;

const CRYSTAL: &str = r#"
struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_pos: vec3<f32>,
    @location(1) world_normal: vec3<f32>,
};

@vertex
fn vs_main(vertex: VertexInput) -> VertexOutput {
    let world_pos = frame.model * vec4<f32>(vertex.position, 1.0);
    var out: VertexOutput;
    out.clip_position = frame.view_proj * world_pos;
    out.world_pos = world_pos.xyz;
    out.world_normal = normalize((frame.model * vec4<f32>(vertex.normal, 0.0)).xyz);
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let n = normalize(in.world_normal);
    let v = normalize(frame.eye.xyz - in.world_pos);
    let metalness = frame.material.x;
    let roughness = clamp(frame.material.y, 0.04, 1.0);
    let env_intensity = frame.material.z;
    let thickness = frame.material.w;
    let base = frame.base_color.rgb;

    let f0 = mix(vec3<f32>(0.04), base, metalness);
    let n_dot_v = max(dot(n, v), 0.0);
    let fresnel = f0 + (vec3<f32>(1.0) - f0) * pow(1.0 - n_dot_v, 5.0);

    let reflected = sample_env(reflect(-v, n)) * env_intensity;
    var color = reflected * fresnel * (1.0 - 0.5 * roughness);

    if thickness > 0.0 {
        let refracted = sample_env(refract(-v, n, 1.0 / 1.5)) * env_intensity;
        let absorb = exp(-thickness * (vec3<f32>(1.0) - base));
        color += refracted * absorb * (vec3<f32>(1.0) - fresnel) * (1.0 - metalness);
    }

    let diffuse_color = base * (1.0 - metalness);
    color += frame.ambient.rgb * frame.ambient.a * diffuse_color;

    let shininess = 2.0 / (roughness * roughness) - 2.0;
    for (var i = 0u; i < 4u; i = i + 1u) {
        if frame.light_color[i].a < 0.5 {
            continue;
        }
        let to_light = frame.light_pos[i].xyz - in.world_pos;
        let l = normalize(to_light);
        let h = normalize(l + v);
        let radiance = frame.light_color[i].rgb * frame.light_pos[i].w;
        let n_dot_l = max(dot(n, l), 0.0);
        let spec = pow(max(dot(n, h), 0.0), shininess) * (shininess + 8.0) / (8.0 * PI);
        color += radiance * n_dot_l * (diffuse_color / PI + fresnel * spec);
    }

    return fade(color);
}
"#;

const SKY: &str = r#"
struct SkyOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) ndc: vec2<f32>,
};

// Fullscreen triangle.
@vertex
fn vs_sky(@builtin(vertex_index) index: u32) -> SkyOutput {
    let x = f32((index << 1u) & 2u) * 2.0 - 1.0;
    let y = f32(index & 2u) * 2.0 - 1.0;
    var out: SkyOutput;
    out.clip_position = vec4<f32>(x, y, 1.0, 1.0);
    out.ndc = vec2<f32>(x, y);
    return out;
}

@fragment
fn fs_sky(in: SkyOutput) -> @location(0) vec4<f32> {
    let near = frame.inv_view_proj * vec4<f32>(in.ndc, 0.0, 1.0);
    let far = frame.inv_view_proj * vec4<f32>(in.ndc, 1.0, 1.0);
    let dir = far.xyz / far.w - near.xyz / near.w;
    return fade(sample_env(dir));
}
"#;

pub fn crystal_shader() -> String {
    format!("{COMMON}{CRYSTAL}")
}

pub fn sky_shader() -> String {
    format!("{COMMON}{SKY}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shaders_share_the_uniform_block() {
        for src in [crystal_shader(), sky_shader()] {
            assert!(src.contains("var<uniform> frame: Frame;"));
            assert!(src.contains("fn fade("));
        }
        assert!(crystal_shader().contains("fn fs_main"));
        assert!(sky_shader().contains("fn fs_sky"));
    }
}
