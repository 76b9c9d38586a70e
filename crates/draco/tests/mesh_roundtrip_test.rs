use draco::{
    get_encoded_geometry_type, AttributeBuffer, AttributeRole, DecodedGeometry, Decoder, ElementKind, Encoder,
    Error, Geometry, GeometryType, Mesh, MeshBuilder, PointCloud, PointCloudBuilder,
};

const NUM_FACES: usize = 12;

const VERTS: [[f32; 3]; 36] = [
    [0.0, 0.0, 0.0],
    [1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, 1.0, 0.0],
    [1.0, 0.0, 0.0],
    [1.0, 1.0, 0.0],
    [0.0, 1.0, 1.0],
    [1.0, 0.0, 1.0],
    [0.0, 0.0, 1.0],
    [1.0, 1.0, 1.0],
    [1.0, 0.0, 1.0],
    [0.0, 1.0, 1.0],
    [0.0, 1.0, 0.0],
    [1.0, 1.0, 0.0],
    [0.0, 1.0, 1.0],
    [0.0, 1.0, 1.0],
    [1.0, 1.0, 0.0],
    [1.0, 1.0, 1.0],
    [0.0, 0.0, 1.0],
    [1.0, 0.0, 0.0],
    [0.0, 0.0, 0.0],
    [1.0, 0.0, 1.0],
    [1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0],
    [1.0, 0.0, 0.0],
    [1.0, 0.0, 1.0],
    [1.0, 1.0, 0.0],
    [1.0, 1.0, 0.0],
    [1.0, 0.0, 1.0],
    [1.0, 1.0, 1.0],
    [0.0, 1.0, 0.0],
    [0.0, 0.0, 1.0],
    [0.0, 0.0, 0.0],
    [0.0, 1.0, 1.0],
    [0.0, 0.0, 1.0],
    [0.0, 1.0, 0.0],
];

const TEXCOORDS: [[f32; 2]; 36] = [
    [0.0, 0.5],
    [0.5, 0.5],
    [0.5, 0.5],
    [0.5, 0.5],
    [0.5, 0.5],
    [0.5, 0.5],
    [0.5, 0.5],
    [0.5, 0.5],
    [0.5, 0.5],
    [0.5, 0.5],
    [0.5, 0.5],
    [0.5, 0.5],
    [0.0, 0.5],
    [0.5, 0.5],
    [0.5, 0.5],
    [0.5, 0.5],
    [0.5, 0.5],
    [0.5, 0.5],
    [0.5, 0.5],
    [0.5, 0.5],
    [0.5, 0.5],
    [0.5, 0.5],
    [0.5, 0.5],
    [0.5, 0.5],
    [0.0, 0.5],
    [0.5, 0.5],
    [0.5, 0.5],
    [0.5, 0.5],
    [0.5, 0.5],
    [0.5, 0.5],
    [0.5, 0.5],
    [0.5, 0.5],
    [0.5, 0.5],
    [0.5, 0.5],
    [0.5, 0.5],
    [0.5, 0.5],
];

fn cube() -> Mesh {
    let mut builder = MeshBuilder::new();
    builder.start(NUM_FACES);
    assert_eq!(builder.set_attribute(NUM_FACES, &VERTS, AttributeRole::Position), Ok(0));
    assert_eq!(builder.set_attribute(NUM_FACES, &TEXCOORDS, AttributeRole::TexCoord), Ok(1));
    builder.finish().unwrap()
}

#[test]
fn cube_survives_encode_decode() {
    let _ = draco::init_logging(log::LevelFilter::Debug);
    let bytes = Encoder::new().encode_mesh(&cube()).unwrap();
    assert!(!bytes.is_empty());
    assert_eq!(get_encoded_geometry_type(&bytes), GeometryType::TriangularMesh);

    let mut mesh = Mesh::new();
    Decoder::new().decode_mesh(&mut mesh, &bytes).unwrap();
    assert_eq!(mesh.num_faces() as usize, NUM_FACES);
    assert_eq!(mesh.num_points(), 36);
    assert_eq!(mesh.num_attrs(), 2);

    let faces = mesh.faces(None);
    let expected: Vec<u32> = (0..36).collect();
    assert_eq!(faces, expected);

    let position = mesh.named_attr(AttributeRole::Position).unwrap();
    assert_eq!(position.num_components(), 3);
    assert_eq!(position.data_type(), Some(ElementKind::Float32));
    assert_eq!(position.byte_stride(), 12);
    assert_eq!(position.byte_offset(), 0);
    assert!(!position.normalized());
    assert_eq!(position.size(), 36);

    let (flat, ok) = mesh.attr_values(&position, Vec::<f32>::new());
    assert!(ok);
    for (face, corners) in faces.chunks(3).enumerate() {
        for &p in corners {
            let p = p as usize;
            assert_eq!(&flat[p * 3..p * 3 + 3], &VERTS[p][..], "face {}", face);
        }
    }

    let uv = mesh.attr_by_unique_id(1).unwrap();
    assert_eq!(uv.role(), AttributeRole::TexCoord);
    assert_eq!(mesh.attr_vectors::<[f32; 2]>(&uv).unwrap(), TEXCOORDS.to_vec());
}

#[test]
fn attribute_reads_accept_any_buffer() {
    let mesh = cube();
    let attr = mesh.attr_by_unique_id(0).unwrap();
    for buffer in [
        None,
        Some(AttributeBuffer::Float64(Vec::new())),
        Some(AttributeBuffer::Float32(vec![1.0, 2.0, 3.0])),
        Some(AttributeBuffer::Int32(vec![1, 2, 3])),
        Some(AttributeBuffer::Float64(vec![0.0; 1000])),
    ] {
        // Empty buffers read in the attribute's own kind.
        let kind = buffer.as_ref().filter(|b| !b.is_empty()).map(AttributeBuffer::kind);
        let (values, ok) = mesh.attr_data(&attr, buffer);
        assert!(ok);
        assert_eq!(values.len(), 36 * 3);
        assert_eq!(values.kind(), kind.unwrap_or(ElementKind::Float32));
    }
    let (values, _) = mesh.attr_data(&attr, Some(AttributeBuffer::Uint8(vec![9])));
    assert_eq!(values.as_slice::<u8>().map(|v| &v[..6]), Some(&[0, 0, 0, 1, 0, 0][..]));
    let (values, _) = mesh.attr_data(&attr, Some(AttributeBuffer::Uint8(Vec::new())));
    assert_eq!(values.kind(), ElementKind::Float32);
}

#[test]
fn quantized_positions_stay_close() {
    let mut encoder = Encoder::new();
    encoder.set_attribute_quantization(AttributeRole::Position, 10);
    encoder.set_attribute_quantization(AttributeRole::TexCoord, 8);
    let bytes = encoder.encode_mesh(&cube()).unwrap();
    let mesh = Decoder::new().decode(GeometryType::TriangularMesh, &bytes).unwrap().into_mesh().unwrap();
    let position = mesh.named_attr(AttributeRole::Position).unwrap();
    let decoded = mesh.attr_vectors::<[f32; 3]>(&position).unwrap();
    for (got, want) in decoded.iter().zip(VERTS.iter()) {
        for k in 0..3 {
            assert!((got[k] - want[k]).abs() < 1e-3, "{:?} vs {:?}", got, want);
        }
    }
}

#[test]
fn decode_target_is_chosen_by_caller() {
    let bytes = Encoder::new().encode_mesh(&cube()).unwrap();
    let decoder = Decoder::new();

    let decoded = decoder.decode(GeometryType::PointCloud, &bytes).unwrap();
    assert_eq!(decoded.geometry_type(), GeometryType::PointCloud);
    assert_eq!(decoded.num_points(), 36);
    assert!(matches!(decoded, DecodedGeometry::PointCloud(_)));

    let mut pc = PointCloud::new();
    decoder.decode_point_cloud(&mut pc, &bytes).unwrap();
    let cloud_bytes = Encoder::new().encode_point_cloud(&pc).unwrap();
    assert_eq!(get_encoded_geometry_type(&cloud_bytes), GeometryType::PointCloud);

    let mesh = decoder.decode(GeometryType::TriangularMesh, &cloud_bytes).unwrap().into_mesh().unwrap();
    assert_eq!(mesh.num_faces(), 0);
    assert_eq!(mesh.num_points(), 36);
    assert!(mesh.faces(Some(vec![7; 3])).is_empty());
}

#[test]
fn failed_decode_keeps_target() {
    let bytes = Encoder::new().encode_mesh(&cube()).unwrap();
    let mut mesh = cube();
    let err = Decoder::new().decode_mesh(&mut mesh, &bytes[..bytes.len() - 1]).unwrap_err();
    assert_eq!(err.code(), Some(-1));
    assert_eq!(mesh.num_faces() as usize, NUM_FACES);

    let err = Decoder::new().decode_mesh(&mut mesh, &[1, 2, 3]).unwrap_err();
    assert_eq!(err.to_string(), "draco: [-2] Failed to parse Draco header.");
}

#[test]
fn zero_length_buffers_are_filled() {
    let mut builder = PointCloudBuilder::new();
    builder.start(1);
    builder.set_attribute(1, &[[3i64, -4]], AttributeRole::Generic).unwrap();
    let pc = builder.finish().unwrap();
    let attr = pc.attr(0).unwrap();
    let (values, ok) = pc.attr_data(&attr, Some(AttributeBuffer::Float32(Vec::new())));
    assert!(ok);
    assert_eq!(values, AttributeBuffer::Int64(vec![3, -4]));

    let mut empty = Mesh::new();
    Decoder::new()
        .decode_mesh(&mut empty, &Encoder::new().encode_point_cloud(&PointCloud::new()).unwrap())
        .unwrap();
    assert_eq!(empty.num_points(), 0);
    assert!(empty.attr(0).is_none());
}

#[test]
fn release_is_idempotent_everywhere() {
    let mut mesh = cube();
    mesh.release();
    mesh.release();
    assert_eq!(mesh.num_points(), 0);
    assert_eq!(Encoder::new().encode_mesh(&mesh), Err(Error::Released));
    assert_eq!(Decoder::new().decode_mesh(&mut mesh, b"DRACO"), Err(Error::Released));

    let mut decoder = Decoder::new();
    decoder.release();
    assert!(decoder.is_released());
    drop(decoder);

    // The builder handle is gone once the product is taken.
    let mut builder = PointCloudBuilder::new();
    builder.start(1);
    builder.set_attribute(1, &[true], AttributeRole::Generic).unwrap();
    let mut pc = builder.finish().unwrap();
    pc.release();
    pc.release();
}

#[test]
fn wrappers_move_across_threads() {
    let mesh = cube();
    let encoder = Encoder::new();
    let bytes = std::thread::spawn(move || encoder.encode_mesh(&mesh).unwrap())
        .join()
        .unwrap();
    assert_eq!(get_encoded_geometry_type(&bytes), GeometryType::TriangularMesh);
}
