// src/rendering_lib/shader.rs

pub const MAX_LIGHTS: usize = 4;

pub const WGSL_SHADER_SOURCE: &str = r#"
struct FrameUniforms {
    view_proj: mat4x4<f32>,
    camera_pos: vec4<f32>,
    ambient: vec4<f32>,
    // xyz = direction towards the light, w = intensity
    light_dirs: array<vec4<f32>, 4>,
    light_colors: array<vec4<f32>, 4>,
    // x = light count
    params: vec4<f32>,
}

struct MaterialUniforms {
    base_color: vec4<f32>,
    // rgb = emissive colour, w = emissive intensity
    emissive: vec4<f32>,
    // x = metalness, y = roughness
    surface: vec4<f32>,
}

@group(0) @binding(0)
var<uniform> frame: FrameUniforms;

@group(1) @binding(0)
var<uniform> material: MaterialUniforms;
@group(1) @binding(1)
var art_texture: texture_2d<f32>;
@group(1) @binding(2)
var art_sampler: sampler;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
}

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_pos: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
}

@vertex
fn vs_main(model: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = frame.view_proj * vec4<f32>(model.position, 1.0);
    out.world_pos = model.position;
    out.normal = model.normal;
    out.uv = model.uv;
    return out;
}

@fragment
fn fs_main(in: VertexOutput, @builtin(front_facing) front_facing: bool) -> @location(0) vec4<f32> {
    // Untextured materials bind a white texel, so sampling is unconditional.
    let texel = textureSample(art_texture, art_sampler, in.uv);

    var n = normalize(in.normal);
    if (!front_facing) {
        n = -n;
    }
    let albedo = material.base_color.rgb * texel.rgb;
    let metalness = material.surface.x;
    let roughness = material.surface.y;
    let view_dir = normalize(frame.camera_pos.xyz - in.world_pos);
    let shininess = mix(96.0, 4.0, roughness);
    let spec_tint = mix(vec3<f32>(0.04), albedo, metalness);

    var diffuse = frame.ambient.rgb;
    var specular = vec3<f32>(0.0);
    let light_count = u32(frame.params.x);
    for (var i = 0u; i < light_count; i = i + 1u) {
        let l = normalize(frame.light_dirs[i].xyz);
        let radiance = frame.light_colors[i].rgb * frame.light_dirs[i].w;
        diffuse = diffuse + radiance * max(dot(n, l), 0.0);
        let h = normalize(l + view_dir);
        specular = specular + radiance * pow(max(dot(n, h), 0.0), shininess) * (1.0 - 0.5 * roughness);
    }

    let color = albedo * diffuse * (1.0 - 0.5 * metalness)
        + specular * spec_tint
        + material.emissive.rgb * material.emissive.w;
    return vec4<f32>(color, 1.0);
}
"#;
