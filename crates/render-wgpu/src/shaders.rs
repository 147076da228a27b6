/// WGSL shader for lit, optionally textured and fogged meshes.
///
/// Lighting is evaluated per fragment in eye space. Light slot layout:
/// `position.w` is 1 for an enabled slot, `direction.w` is the cosine of the
/// spot cutoff, `params` is (exponent, radius, kind, unused) with kind 0 for
/// point and 1 for spot.
pub const MESH_SHADER: &str = r#"
const MAX_LIGHTS: u32 = 8u;
const SHININESS: f32 = 180.0;
const GLOBAL_AMBIENT: vec3<f32> = vec3<f32>(0.2, 0.2, 0.2);
const MATERIAL_DIFFUSE: vec3<f32> = vec3<f32>(0.8, 0.8, 0.8);
const MATERIAL_SPECULAR: vec3<f32> = vec3<f32>(1.0, 1.0, 1.0);

struct Light {
    position: vec4<f32>,
    color: vec4<f32>,
    direction: vec4<f32>,
    params: vec4<f32>,
};

struct FrameUniforms {
    projection: mat4x4<f32>,
    view: mat4x4<f32>,
    lights: array<Light, 8>,
    fog_color: vec4<f32>,
    // start, end, density, mode
    fog: vec4<f32>,
    // fog enabled, texture enabled, sphere map, unused
    flags: vec4<f32>,
};

struct DrawUniforms {
    world: mat4x4<f32>,
    // alpha, unused...
    tint: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> frame_data: FrameUniforms;

@group(1) @binding(0)
var<uniform> draw_data: DrawUniforms;

@group(2) @binding(0)
var base_texture: texture_2d<f32>;
@group(2) @binding(1)
var base_sampler: sampler;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) texcoord: vec2<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) eye_position: vec3<f32>,
    @location(1) eye_normal: vec3<f32>,
    @location(2) texcoord: vec2<f32>,
};

@vertex
fn vs_main(vertex: VertexInput) -> VertexOutput {
    let model_view = frame_data.view * draw_data.world;
    let eye = model_view * vec4<f32>(vertex.position, 1.0);

    var out: VertexOutput;
    out.clip_position = frame_data.projection * eye;
    out.eye_position = eye.xyz;
    out.eye_normal = normalize((model_view * vec4<f32>(vertex.normal, 0.0)).xyz);
    out.texcoord = vertex.texcoord;
    return out;
}

fn sphere_map(eye_position: vec3<f32>, normal: vec3<f32>) -> vec2<f32> {
    let u = normalize(eye_position);
    let r = reflect(u, normal);
    let m = 2.0 * sqrt(r.x * r.x + r.y * r.y + (r.z + 1.0) * (r.z + 1.0));
    return vec2<f32>(r.x / m + 0.5, 0.5 - r.y / m);
}

fn fog_factor(distance: f32) -> f32 {
    let mode = u32(frame_data.fog.w);
    var f: f32;
    if mode == 0u {
        let range = frame_data.fog.y - frame_data.fog.x;
        if range <= 0.0 {
            f = 1.0;
        } else {
            f = (frame_data.fog.y - distance) / range;
        }
    } else if mode == 1u {
        f = exp(-frame_data.fog.z * distance);
    } else {
        let d = frame_data.fog.z * distance;
        f = exp(-d * d);
    }
    return clamp(f, 0.0, 1.0);
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let to_eye = normalize(-in.eye_position);
    let facing = normalize(in.eye_normal);
    // two-sided lighting
    let n = select(facing, -facing, dot(facing, to_eye) < 0.0);

    var lit = GLOBAL_AMBIENT * MATERIAL_DIFFUSE;
    for (var i = 0u; i < MAX_LIGHTS; i = i + 1u) {
        let light = frame_data.lights[i];
        if light.position.w != 0.0 {
            let offset = light.position.xyz - in.eye_position;
            let distance = length(offset);
            let l = offset / max(distance, 1e-5);
            let radius = light.params.y;
            var attenuation = select(0.0, clamp(1.0 - distance / radius, 0.0, 1.0), radius > 0.0);
            if light.params.z > 0.5 {
                let spot_cos = dot(-l, normalize(light.direction.xyz));
                let cone = pow(max(spot_cos, 0.0), light.params.x);
                attenuation = attenuation * select(0.0, cone, spot_cos >= light.direction.w);
            }
            let diffuse = max(dot(n, l), 0.0);
            let h = normalize(l + to_eye);
            let specular = select(0.0, pow(max(dot(n, h), 0.0), SHININESS), diffuse > 0.0);
            lit = lit + attenuation * (light.color.rgb * MATERIAL_DIFFUSE * diffuse
                + MATERIAL_SPECULAR * specular);
        }
    }

    var color = vec4<f32>(lit, 1.0);
    if frame_data.flags.y > 0.5 {
        var uv = in.texcoord;
        if frame_data.flags.z > 0.5 {
            uv = sphere_map(in.eye_position, n);
        }
        color = color * textureSample(base_texture, base_sampler, uv);
    }
    color.a = color.a * draw_data.tint.x;

    if frame_data.flags.x > 0.5 {
        let f = fog_factor(length(in.eye_position));
        color = vec4<f32>(mix(frame_data.fog_color.rgb, color.rgb, f), color.a);
    }
    return color;
}
"#;
